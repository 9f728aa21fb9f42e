mod batch;
mod single;
pub(crate) mod util;
