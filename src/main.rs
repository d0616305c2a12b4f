use clap::Parser;
use pkg_icon::adapters::plist_data::PlistData;
use pkg_icon::adapters::unpack::read_embedded_info_plist;
use pkg_icon::core::ios::find_icons;
use pkg_icon::core::IconPipeline;
use pkg_icon::domain::model::LogicalIconRef;
use pkg_icon::utils::error::ErrorSeverity;
use pkg_icon::utils::{logger, validation::Validate};
use pkg_icon::{
    AndroidPipeline, ApktoolUnpacker, ArchiveUnpacker, CliConfig, FetchOutcome, IconFetcher,
    IosPipeline, PackageDescriptor, Platform, PreparedTree, ResolverOptions,
};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match execute(&config) {
        Ok(outcome) => report(&config, &outcome),
        Err(e) => {
            tracing::error!(
                "Icon extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn execute(config: &CliConfig) -> pkg_icon::Result<FetchOutcome> {
    let package = config.package_descriptor()?;
    let options = config.resolver_options()?;

    // iOS dry run reads Info.plist straight out of the archive
    if config.dry_run && !config.unpacked && package.platform == Platform::Ios {
        return declared_from_archive(&package);
    }

    let workdir = match &config.workdir {
        Some(dir) => dir.clone(),
        // nothing gets written for an already unpacked tree
        None if config.unpacked => config.package.clone(),
        None => tempfile::Builder::new().prefix("pkg-icon-").tempdir()?.keep(),
    };
    tracing::debug!("Work directory: {}", workdir.display());

    match (package.platform, config.unpacked) {
        (Platform::Android, true) => run(android_pipeline(PreparedTree, &options), config, &package, &workdir),
        (Platform::Android, false) => run(
            android_pipeline(ApktoolUnpacker::new(options.apktool.clone()), &options),
            config,
            &package,
            &workdir,
        ),
        (Platform::Ios, true) => run(ios_pipeline(PreparedTree, &options), config, &package, &workdir),
        (Platform::Ios, false) => run(ios_pipeline(ArchiveUnpacker, &options), config, &package, &workdir),
    }
}

fn android_pipeline<U: pkg_icon::core::Unpacker>(unpacker: U, options: &ResolverOptions) -> AndroidPipeline<U> {
    AndroidPipeline::new(unpacker).with_prefix_policy(options.icon_prefix_policy)
}

fn ios_pipeline<U: pkg_icon::core::Unpacker>(unpacker: U, options: &ResolverOptions) -> IosPipeline<U> {
    IosPipeline::new(unpacker)
        .with_bundle_name(options.bundle_name.clone())
        .with_missing_icon_policy(options.missing_icon_policy)
}

fn run<P: IconPipeline>(
    pipeline: P,
    config: &CliConfig,
    package: &PackageDescriptor,
    workdir: &Path,
) -> pkg_icon::Result<FetchOutcome> {
    let fetcher = IconFetcher::new(pipeline);

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - declaration lookup only");
        let declared = fetcher.declared(package, workdir)?;
        return Ok(FetchOutcome {
            package: package.clone(),
            declared: declared.map(|d| d.icon),
            icon: None,
        });
    }

    let mut outcome = fetcher.fetch(package, workdir)?;

    if let (Some(output), Some(icon)) = (&config.output, &outcome.icon) {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(icon, output)?;
        tracing::info!("📁 Icon copied to: {}", output.display());
        outcome.icon = Some(PathBuf::from(output));
    }

    Ok(outcome)
}

fn declared_from_archive(package: &PackageDescriptor) -> pkg_icon::Result<FetchOutcome> {
    let bytes = read_embedded_info_plist(&package.path)?;
    let plist = PlistData::from_bytes(&bytes)?;
    let declared = match find_icons(&plist)?.into_iter().next() {
        Some(first) => Some(LogicalIconRef::new(first)?),
        None => None,
    };

    Ok(FetchOutcome {
        package: package.clone(),
        declared,
        icon: None,
    })
}

fn report(config: &CliConfig, outcome: &FetchOutcome) -> anyhow::Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match (&outcome.icon, &outcome.declared) {
        (Some(icon), _) => println!("{}", icon.display()),
        (None, Some(declared)) => println!("{}", declared),
        (None, None) => {
            tracing::info!("No icon declared by {}", outcome.package.path.display());
            eprintln!("ℹ️ The package declares no icon");
        }
    }
    Ok(())
}
