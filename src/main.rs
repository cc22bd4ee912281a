use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::{env, fs, path};

use trackr::config::Config;
use trackr::logging::init_tracing;
use trackr::remote::DirRemote;
use trackr::{report, run, scan_directory};

///////////////////////
// Utility functions //
///////////////////////

fn init_trackr_dir() -> Result<path::PathBuf, Box<dyn Error>> {
	match env::var("HOME") {
		Ok(home) => {
			let trackr_dir = path::PathBuf::from(home).join(".trackr");

			match fs::metadata(&trackr_dir) {
				Ok(meta) => {
					if meta.is_dir() {
						Ok(trackr_dir)
					} else {
						Err(format!("{} exists, but it is not a directory!", trackr_dir.display())
							.into())
					}
				}
				Err(_err) => {
					// Not exists
					fs::create_dir(&trackr_dir)
						.map_err(|err| format!("Cannot create directory: {}", err))?;
					Ok(trackr_dir)
				}
			}
		}
		Err(_e) => Err("Could not determine HOME directory!".into()),
	}
}

fn build_config(matches: &clap::ArgMatches) -> Result<Config, Box<dyn Error>> {
	let trackr_dir = match matches.get_one::<String>("state-dir") {
		Some(dir) => path::PathBuf::from(dir),
		None => init_trackr_dir()?,
	};

	let mut config = Config::load_or_default(&trackr_dir);
	if let Some(profile) = matches.get_one::<String>("profile") {
		config.profile = profile.to_string();
	}
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	init_tracing();

	let matches = Command::new("trackr")
		.version("0.2.0")
		.about("Snapshot-diff directory change detector with remote upload")
		.subcommand_required(true)
		.arg(
			Arg::new("profile")
				.short('p')
				.long("profile")
				.value_name("PROFILE")
				.help("Profile (state is kept per profile)")
				.global(true),
		)
		.arg(
			Arg::new("state-dir")
				.long("state-dir")
				.value_name("DIR")
				.help("State directory (default ~/.trackr)")
				.global(true),
		)
		.subcommand(
			Command::new("run")
				.about("Scan, diff, upload new files and persist the snapshot")
				.arg(Arg::new("dir").required(true).help("Tracked directory"))
				.arg(
					Arg::new("remote")
						.long("remote")
						.value_name("DIR")
						.required(true)
						.help("Target directory of the built-in filesystem remote"),
				)
				.arg(
					Arg::new("modified")
						.long("modified")
						.action(ArgAction::SetTrue)
						.help("Also upload modified files"),
				)
				.arg(
					Arg::new("dry-run")
						.long("dry-run")
						.action(ArgAction::SetTrue)
						.help("Report changes without uploading or persisting"),
				),
		)
		.subcommand(
			Command::new("status")
				.about("Report changes without uploading or touching state")
				.arg(Arg::new("dir").required(true).help("Tracked directory")),
		)
		.subcommand(
			Command::new("dump")
				.about("Print the current snapshot of a directory")
				.arg(Arg::new("dir").required(true).help("Directory to scan")),
		)
		.get_matches();

	if let Some(sub_matches) = matches.subcommand_matches("run") {
		let dir = sub_matches.get_one::<String>("dir").ok_or("run: directory argument required")?;
		let target =
			sub_matches.get_one::<String>("remote").ok_or("run: --remote argument required")?;

		let mut config = build_config(&matches)?;
		if sub_matches.get_flag("modified") {
			config.upload_modified = true;
		}
		if sub_matches.get_flag("dry-run") {
			config.dry_run = true;
		}

		let remote = DirRemote::new(path::PathBuf::from(target));
		let summary = run::run(path::Path::new(dir), &config, &remote).await?;

		print!("{}", report::render_changes(&summary.changes));
		print!("{}", report::render_sync(&summary.report));
	} else if let Some(sub_matches) = matches.subcommand_matches("status") {
		let dir =
			sub_matches.get_one::<String>("dir").ok_or("status: directory argument required")?;

		let config = build_config(&matches)?;
		let (changes, _current) = run::status(path::Path::new(dir), &config).await?;
		print!("{}", report::render_changes(&changes));
	} else if let Some(sub_matches) = matches.subcommand_matches("dump") {
		let dir =
			sub_matches.get_one::<String>("dir").ok_or("dump: directory argument required")?;

		let config = build_config(&matches)?;
		let snapshot = scan_directory(path::Path::new(dir), &config)?;
		for (path, fingerprint) in snapshot.iter() {
			println!("{}: {:?}", path, fingerprint);
		}
	}

	Ok(())
}

// vim: ts=4
