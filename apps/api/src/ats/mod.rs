// ATS testing: the pure compatibility scorer and its HTTP surface.
// Handlers validate and meter; all scoring lives in `scorer`.

pub mod handlers;
pub mod scorer;
