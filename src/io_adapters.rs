use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;

/// Memory-backed writer for capturing the output of internal commands in tests.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Create a writer and return it with a handle to the bytes it collects.
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                buf: Rc::clone(&buf),
            },
            buf,
        )
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl crate::command::Stdout for MemWriter {
    /// Children spawned with this writer have nowhere to send output.
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::null()
    }
}
