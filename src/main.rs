/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::bank::credit_agricole::core::CreditAgricole;
use crate::bank::region::Region;
use crate::bank::session::BankSession;
use crate::bank::settings::ValidatedSettings;
use crate::config::config_file::Config;
use crate::config::filesystem::get_config;
use crate::import::geo::{locate_region, Nominatim};
use crate::import::pipeline::TransactionImportPipeline;
use crate::ledger::firefly::core::FireflyClient;
use crate::reports::import_reporter::{
	print_accounts, print_classification, ImportReporter,
};
use anyhow::{anyhow, bail, Error};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bank;
mod classify;
mod config;
mod error;
mod import;
mod ledger;
mod reports;
mod util;

#[derive(Parser)]
#[command(
	name = "cafire",
	version,
	about = "Imports Crédit Agricole transactions into Firefly III"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The bank description to run through the rules, for the Classify command
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/cafire/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Fetch this many days back, today included, instead of the configured
	/// lookback
	#[arg(short, long)]
	days: Option<u32>,

	/// Fetch at most this many transactions per account
	#[arg(short, long)]
	max: Option<u32>,

	/// Print what an import would send instead of sending it
	#[arg(long)]
	dry_run: bool,

	/// Log debug detail to stderr
	#[arg(short, long)]
	verbose: bool,
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Check,    // validate the bank settings
	Classify, // run one description through the rules, offline
	Accounts, // list the enabled accounts the bank knows about
	Import,   // fetch, classify and send to the ledger
	Locate,   // geocode the bank region
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();

	// The token command is only worth running when we are about to talk to
	// Firefly
	let needs_ledger = args.command == Directive::Import && !args.dry_run;
	let config = get_config(args.config.as_ref(), needs_ledger)?;
	init_tracing(args.verbose || config.settings.debug);

	match args.command {
		Directive::Check => check(&config)?,
		Directive::Classify => {
			let Some(term) = &args.term else {
				bail!("No description specified");
			};
			classify(&config, term);
		},
		Directive::Accounts => accounts(&config)?,
		Directive::Import => import(config, &args)?,
		Directive::Locate => locate(&config)?,
	}

	Ok(())
}

fn init_tracing(verbose: bool) {
	let default = if verbose { "cafire=debug" } else { "cafire=info" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn check(config: &Config) -> Result<(), Error> {
	let problems = config.bank.validate();
	if problems.is_empty() {
		println!("Settings OK");
		return Ok(());
	}

	for problem in &problems {
		println!("{}", problem);
	}
	bail!("{} problem(s) in bank settings", problems.len())
}

fn classify(config: &Config, description: &str) {
	let classification = config.rules.classify(description);
	let transfer = if config.settings.auto_detect_transfers {
		config.transfers.detect(description)
	} else {
		None
	};
	print_classification(&classification, transfer);
}

fn accounts(config: &Config) -> Result<(), Error> {
	let settings = ValidatedSettings::try_from(&config.bank)?;
	let client = CreditAgricole::new(config.settings.timeout());
	let session = BankSession::open(client, &settings)?;

	print_accounts(&session.list_enabled_accounts()?);
	Ok(())
}

fn import(config: Config, args: &Cli) -> Result<(), Error> {
	let mut bank = config.bank;
	if let Some(days) = args.days {
		bank.lookback_days = days.to_string();
	}
	if let Some(max) = args.max {
		bank.max_transactions = max.to_string();
	}

	let timeout = config.settings.timeout();

	// build the sink before logging in so a missing token fails fast
	let sink = if args.dry_run {
		None
	} else {
		Some(FireflyClient::new(&config.firefly, timeout)?)
	};

	let mut pipeline = TransactionImportPipeline::new(&config.rules);
	if config.settings.auto_detect_transfers {
		pipeline = pipeline.with_transfers(&config.transfers);
	}
	let items = pipeline.run(CreditAgricole::new(timeout), &bank)?;

	match sink {
		None => ImportReporter::new(items).print_preview(),
		Some(mut sink) => {
			let summary = ledger::sync(&mut sink, &items)?;
			println!(
				"{} created, {} already present, {} skipped",
				summary.created, summary.duplicates, summary.skipped
			);
		},
	}

	Ok(())
}

fn locate(config: &Config) -> Result<(), Error> {
	let region = Region::find(&config.bank.region)
		.ok_or_else(|| anyhow!("unknown bank region '{}'", config.bank.region))?;
	let geocoder = Nominatim::new(config.settings.timeout())?;

	match locate_region(&geocoder, region) {
		Some(coordinates) => println!("{}: {}", region.name, coordinates),
		None => {
			info!(region = region.slug, "no location found");
			println!("{}: unknown", region.name);
		},
	}
	Ok(())
}
