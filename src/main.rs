// Course Catalog - composition root
//
// Bootstraps the catalog from the configured CSV sources and prints a
// per-kind summary. The REST adapter lives in bin/server.rs behind the
// `server` feature; this binary is the offline demo of the same core.

use anyhow::Result;

use course_catalog::{Catalog, Config, EntityKind};

fn main() -> Result<()> {
    // Handle kept alive for the process lifetime; dropping it stops logging.
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let config = Config::from_env();
    println!("course-catalog v{}", course_catalog::VERSION);
    println!("sources:   {}", config.source_dir.display());
    println!("snapshots: {}", config.snapshot_dir.display());

    let (catalog, report) = Catalog::bootstrap(config);

    println!();
    for source in &report.sources {
        match &source.result {
            Ok(count) => println!("  {:<12} {} loaded", source.name, count),
            Err(reason) => println!("  {:<12} FAILED: {}", source.name, reason),
        }
    }
    println!();
    println!(
        "catalog ready: {} students, {} courses, {} instructors, {} modules",
        catalog.students().size(),
        catalog.courses().size(),
        catalog.instructors().size(),
        catalog.modules().size(),
    );

    // Write an initial snapshot of everything that loaded, so the snapshot
    // directory reflects the serving state from the start.
    for kind in EntityKind::ALL {
        let result = match kind {
            EntityKind::Student => catalog.save_students(),
            EntityKind::Course => catalog.save_courses(),
            EntityKind::Instructor => catalog.save_instructors(),
            EntityKind::Module => catalog.save_modules(),
        };
        if let Err(err) = result {
            eprintln!("warning: could not snapshot {}: {:#}", kind.plural(), err);
        }
    }

    Ok(())
}
