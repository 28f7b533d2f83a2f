//! Version command implementation

use crate::cli::Output;
use crate::search::default_workers;
use anyhow::Result;

/// Execute the version command
pub async fn execute(output: &Output) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");
    let repository = env!("CARGO_PKG_REPOSITORY");

    output.header(&format!("{name} v{version}"));
    output.key_value("Description:", description, false);
    output.key_value("Repository:", repository, false);

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );
    output.key_value("CPU cores:", &num_cpus::get().to_string(), false);
    output.key_value("Default workers:", &default_workers().to_string(), false);

    output.blank_line();
    output.success("💡 Run 'unlockr --help' for usage information");

    Ok(())
}
