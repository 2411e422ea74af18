use super::traceback_error::TracebackError;

pub trait ResultLogExt<T> {
    fn log_error(self);
}

impl<T> ResultLogExt<T> for Result<T, TracebackError> {
    fn log_error(self) {
        self.inspect_err(|e| log::error!("{e}")).ok();
    }
}
