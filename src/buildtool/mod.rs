//! Build-tool detection over an analysed CI forest.

pub mod command;
pub mod detect;

pub use command::{BuildTool, BuildToolCommand};
pub use detect::{detect_build_tools, detect_installed_packages, InstalledPackageFact};
