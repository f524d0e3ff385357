/// UI configuration options derived from config, flags, and environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Skip particles and the digit roll; stages still advance.
    pub reduced_motion: bool,
}
