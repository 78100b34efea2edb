//! Scripted [`ProcessRunner`] for tests. Enabled by the `testing` feature.

use std::cell::RefCell;
use std::fs;
use std::io;

use crate::error::Step;
use crate::process::{Invocation, ProcessRunner};

/// Records every invocation and answers with a scripted exit code per step.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Invocation>>,
    pub create_code: Option<i32>,
    pub install_code: Option<i32>,
    /// Lay out `<venv>/bin/python` and `pyvenv.cfg` when the create step succeeds.
    pub materialize: bool,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self::with_codes(0, 0)
    }

    pub fn with_codes(create_code: i32, install_code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            create_code: Some(create_code),
            install_code: Some(install_code),
            materialize: true,
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.borrow().iter().map(|c| c.step).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        self.calls.borrow_mut().push(invocation.clone());
        match invocation.step {
            Step::CreateVenv => {
                if self.create_code == Some(0) && self.materialize {
                    if let Some(name) = invocation.args.last() {
                        let target = invocation.cwd.join(name);
                        fs::create_dir_all(target.join("bin"))?;
                        fs::write(target.join("bin").join("python"), "")?;
                        fs::write(target.join("pyvenv.cfg"), "include-system-site-packages = false\n")?;
                    }
                }
                Ok(self.create_code)
            }
            Step::Install => Ok(self.install_code),
        }
    }
}
