use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use vn_gate::UsageGate;
use vn_ledger::{
    ChallengeBook, MintRequest, OwnerPortfolio, SampleHandle, SynthesisRequest, ValidationReport,
    VoiceLedger,
};
use vn_store::{open_store, CollectionStore};
use vn_types::{DatToken, RoyaltyEvent, VoiceAsset};

use crate::cli::*;
use crate::config::LedgerConfig;

type Ledger = VoiceLedger<Box<dyn CollectionStore>>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        config,
        data_dir,
        memory,
        format,
        ..
    } = cli;
    let open = || open_ledger(config.as_deref(), data_dir.clone(), memory);

    match command {
        Command::Mint(args) => cmd_mint(&open()?, args, format),
        Command::Synthesize(args) => cmd_synthesize(&open()?, args, format),
        Command::Voices => cmd_voices(&open()?, format),
        Command::Dats => cmd_dats(&open()?, format),
        Command::Royalties(args) => cmd_royalties(&open()?, args, format),
        Command::Show(args) => cmd_show(&open()?, args, format),
        Command::ResetUsage(args) => cmd_reset_usage(&open()?, args, format),
        Command::Reset => cmd_reset(&open()?, format),
        Command::Portfolio(args) => cmd_portfolio(&open()?, args, format),
        Command::Verify => cmd_verify(&open()?, format),
        Command::Challenge(args) => cmd_challenge(args, format),
    }
}

/// Build the ledger from configuration and command-line overrides.
fn open_ledger(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
    memory: bool,
) -> anyhow::Result<Ledger> {
    let mut config = LedgerConfig::load(config_path)?;
    config.apply_overrides(data_dir, memory);
    tracing::debug!(store = ?config.store, gate = ?config.gate, "opening ledger");
    let store = open_store(&config.store).context("opening store")?;
    Ok(VoiceLedger::with_gate(
        store,
        UsageGate::with_default_stages(config.gate),
    ))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_mint(ledger: &Ledger, args: MintArgs, format: OutputFormat) -> anyhow::Result<()> {
    let receipt = ledger.mint(MintRequest {
        owner_address: args.owner,
        title: args.title,
        description: args.description,
        royalty_bps: args.royalty_bps,
        commercial_use_allowed: args.commercial,
        monthly_quota: args.quota,
        terms: args.terms,
        sample: args.sample.map(SampleHandle::named),
    })?;
    if format == OutputFormat::Json {
        return print_json(&receipt);
    }
    println!("{} Voice minted", "✓".green().bold());
    println!("  Voice: {}", receipt.voice.id.to_string().yellow());
    println!("  DAT:   {}", receipt.dat.id.to_string().yellow());
    println!("  Royalty: {} bps", receipt.voice.royalty_bps);
    Ok(())
}

fn cmd_synthesize(
    ledger: &Ledger,
    args: SynthesizeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let receipt = ledger.synthesize_with_policy(SynthesisRequest {
        voice_id: args.voice_id,
        requester_address: args.requester,
        text: args.text,
        commercial_use: args.commercial,
    })?;
    if format == OutputFormat::Json {
        return print_json(&receipt);
    }
    println!("{} Synthesis accepted", "✓".green().bold());
    print_royalty(&receipt.royalty);
    Ok(())
}

fn cmd_voices(ledger: &Ledger, format: OutputFormat) -> anyhow::Result<()> {
    let voices = ledger.list_voices();
    if format == OutputFormat::Json {
        return print_json(&voices);
    }
    if voices.is_empty() {
        println!("No voices.");
    }
    for voice in &voices {
        print_voice(voice);
    }
    Ok(())
}

fn cmd_dats(ledger: &Ledger, format: OutputFormat) -> anyhow::Result<()> {
    let dats = ledger.list_dats();
    if format == OutputFormat::Json {
        return print_json(&dats);
    }
    if dats.is_empty() {
        println!("No DATs.");
    }
    for dat in &dats {
        print_dat(dat);
    }
    Ok(())
}

fn cmd_royalties(ledger: &Ledger, args: RoyaltiesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut royalties = ledger.list_royalties();
    if let Some(limit) = args.limit {
        royalties.truncate(limit);
    }
    if format == OutputFormat::Json {
        return print_json(&royalties);
    }
    if royalties.is_empty() {
        println!("No royalty events.");
    }
    for royalty in &royalties {
        print_royalty(royalty);
    }
    Ok(())
}

fn cmd_show(ledger: &Ledger, args: VoiceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let voice = ledger
        .get_voice(args.voice_id)
        .with_context(|| format!("voice not found: {}", args.voice_id))?;
    let dat = ledger.get_dat_for_voice(voice.id)?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "voice": voice, "dat": dat }));
    }
    print_voice(&voice);
    print_dat(&dat);
    Ok(())
}

fn cmd_reset_usage(ledger: &Ledger, args: VoiceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let voice = ledger.reset_usage(args.voice_id)?;
    if format == OutputFormat::Json {
        return print_json(&voice);
    }
    println!(
        "{} Usage reset for {}",
        "✓".green().bold(),
        voice.id.to_string().yellow()
    );
    Ok(())
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct ResetAck {
    reset: bool,
}

fn cmd_reset(ledger: &Ledger, format: OutputFormat) -> anyhow::Result<()> {
    ledger.reset()?;
    if format == OutputFormat::Json {
        return print_json(&ResetAck { reset: true });
    }
    println!("{} Ledger cleared.", "✓".green().bold());
    Ok(())
}

fn cmd_portfolio(ledger: &Ledger, args: PortfolioArgs, format: OutputFormat) -> anyhow::Result<()> {
    let portfolio = ledger.portfolio(&args.owner);
    if format == OutputFormat::Json {
        return print_json(&portfolio);
    }
    print_portfolio(&portfolio);
    Ok(())
}

fn cmd_verify(ledger: &Ledger, format: OutputFormat) -> anyhow::Result<()> {
    let report = ledger.verify();
    if format == OutputFormat::Json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    if !report.is_valid() {
        anyhow::bail!("{} integrity violation(s) found", report.violations.len());
    }
    Ok(())
}

fn cmd_challenge(args: ChallengeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ChallengeAction::Check {
        text,
        transcript,
        threshold,
    } = args.action;
    let book = ChallengeBook::new();
    let challenge = book.create(&text)?;
    let outcome = book.validate(challenge.id, &transcript, threshold)?;
    if format == OutputFormat::Json {
        return print_json(&outcome);
    }
    let verdict = if outcome.passed {
        "passed".green().bold()
    } else {
        "failed".red().bold()
    };
    println!(
        "Challenge {}: score {:.3} (threshold {:.2})",
        verdict, outcome.score, outcome.threshold
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn print_voice(voice: &VoiceAsset) {
    let policy = &voice.usage_policy;
    println!(
        "{}  {}  owner {}",
        voice.id.to_string().yellow().bold(),
        voice.metadata.title.bold(),
        voice.owner_address
    );
    if let Some(description) = &voice.metadata.description {
        println!("  {}", description.dimmed());
    }
    println!(
        "  royalty {} bps | commercial {} | usage {}/{}",
        voice.royalty_bps,
        if policy.commercial_use_allowed {
            "yes".green()
        } else {
            "no".red()
        },
        policy.usage_count_this_month,
        policy.monthly_quota
    );
    println!("  minted {}", voice.created_at.to_string().dimmed());
}

fn print_dat(dat: &DatToken) {
    println!(
        "{} {}  voice {}",
        "DAT".cyan(),
        dat.id.to_string().yellow(),
        dat.voice_id.short_id()
    );
    println!("  terms: {}", dat.metadata.usage_terms);
}

fn print_royalty(royalty: &RoyaltyEvent) {
    println!(
        "{}  {} tokens  voice {}  from {}  (length {})",
        royalty.timestamp.to_string().dimmed(),
        royalty.amount_tokens.to_string().green().bold(),
        royalty.voice_id.short_id(),
        royalty.requester_address,
        royalty.usage_text_length
    );
}

fn print_portfolio(portfolio: &OwnerPortfolio) {
    if portfolio.is_empty() {
        println!("No voices owned by {}.", portfolio.owner_address.bold());
        return;
    }
    println!("Portfolio of {}", portfolio.owner_address.bold());
    for row in &portfolio.earnings {
        println!(
            "  {}  {}  {} syntheses  {} tokens",
            row.voice_id.short_id().yellow(),
            row.title,
            row.synthesis_count,
            row.total_tokens
        );
    }
    println!(
        "Total earned: {} tokens",
        portfolio.total_tokens.to_string().green().bold()
    );
}

fn print_report(report: &ValidationReport) {
    println!(
        "Checked {} voices, {} DATs, {} royalties",
        report.voice_count, report.dat_count, report.royalty_count
    );
    if report.is_valid() {
        println!("{} Pairing integrity verified", "✓".green().bold());
        return;
    }
    for violation in &report.violations {
        println!(
            "  {} {:?} {}: {}",
            "✗".red().bold(),
            violation.kind,
            violation.subject,
            violation.description
        );
    }
}
