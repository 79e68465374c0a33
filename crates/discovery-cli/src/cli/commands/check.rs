//! `discoveryd check` - validate and summarize a configuration.

use anyhow::Result;
use colored::Colorize;
use discovery_srv::config::PolicySource;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let options = &config.options;

    println!(
        "{} {}",
        "Configuration OK:".green().bold(),
        ctx.config.display()
    );
    println!();

    println!("  {} {}", "listen:".bold(), options.listen);
    println!("  {} {}", "endpoint:".bold(), options.endpoint);
    println!(
        "  {} {}",
        "overrideDiscovery:".bold(),
        options.override_discovery
    );
    println!("  {} {}", "tokenKeys:".bold(), options.token_keys);
    println!("  {} {}s", "fetchTimeout:".bold(), options.fetch_timeout);
    println!("  {} {}s", "requestTimeout:".bold(), options.request_timeout);
    println!();

    println!("{}", "Policy sources:".bold());
    println!(
        "  {:<12} {}",
        "maintenance",
        describe_source(&options.maintenance, options.refresh.maintenance, |active| {
            String::from(if *active { "active" } else { "inactive" })
        })
    );
    println!(
        "  {:<12} {}",
        "bans",
        describe_source(&options.bans, options.refresh.bans, |bans| {
            format!("{} entries", bans.len())
        })
    );
    println!(
        "  {:<12} {}",
        "groupdefs",
        describe_source(&options.groupdefs, options.refresh.groupdefs, |defs| {
            format!("{} entries", defs.len())
        })
    );
    println!();

    println!("{}", "Endpoint sets:".bold());
    for (name, set) in &config.endpoints {
        println!("  {}", name.cyan());
        println!("    discovery  {}", set.discovery_host);
        println!("    api        {}", set.api_host);
        println!("    wiiu       {}", set.portal_host);
        println!("    3ds        {}", set.n3ds_host);
    }

    let warnings = config.warnings();
    if !warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in warnings {
            println!("  {} {warning}", "!".yellow());
        }
    }

    Ok(())
}

fn describe_source<T>(
    source: &PolicySource<T>,
    interval_secs: u64,
    describe_static: impl Fn(&T) -> String,
) -> String {
    match source {
        PolicySource::Static(value) => format!("static, {}", describe_static(value)),
        PolicySource::Remote(url) => format!("remote {url} every {interval_secs}s"),
    }
}
