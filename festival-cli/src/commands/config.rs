use anyhow::Result;
use festival_core::config::SiteConfig;
use owo_colors::OwoColorize;

pub fn run(config: &SiteConfig) -> Result<()> {
    let config_path = SiteConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_source);

    println!("\n{}", "Effective settings".bold());
    print!("{}", config.to_toml()?);
    Ok(())
}
