use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vn_ledger::DEFAULT_THRESHOLD;
use vn_types::VoiceId;

#[derive(Parser)]
#[command(
    name = "vn",
    about = "VoiceNet ledger: mint voices, gate synthesis, track royalties",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./vn.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the file store, overriding the configuration
    #[arg(long, global = true, conflicts_with = "memory")]
    pub data_dir: Option<PathBuf>,

    /// Use a volatile store that lives only for this invocation
    #[arg(long, global = true)]
    pub memory: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mint a voice and its paired DAT
    Mint(MintArgs),
    /// Synthesize text with a voice, subject to its usage policy
    Synthesize(SynthesizeArgs),
    /// List minted voices
    Voices,
    /// List DATs
    Dats,
    /// List royalty events, newest first
    Royalties(RoyaltiesArgs),
    /// Show one voice with its DAT
    Show(VoiceArgs),
    /// Zero a voice's usage counter
    ResetUsage(VoiceArgs),
    /// Clear all voices, DATs, and royalties
    Reset,
    /// Show an owner's voices and earnings
    Portfolio(PortfolioArgs),
    /// Check voice/DAT pairing integrity
    Verify,
    /// Score a transcript against a challenge prompt
    Challenge(ChallengeArgs),
}

#[derive(Args)]
pub struct MintArgs {
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Royalty share in basis points (10000 = 100%)
    #[arg(long, default_value = "1000")]
    pub royalty_bps: u32,
    /// Allow commercial synthesis
    #[arg(long)]
    pub commercial: bool,
    #[arg(long, default_value = "100")]
    pub quota: u32,
    #[arg(long, default_value = "Non-exclusive TTS inference only. No retraining.")]
    pub terms: String,
    /// File name of the voice sample
    #[arg(long)]
    pub sample: Option<String>,
}

#[derive(Args)]
pub struct SynthesizeArgs {
    pub voice_id: VoiceId,
    #[arg(long)]
    pub requester: String,
    #[arg(long)]
    pub text: String,
    /// Request commercial use of the output
    #[arg(long)]
    pub commercial: bool,
}

#[derive(Args)]
pub struct RoyaltiesArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct VoiceArgs {
    pub voice_id: VoiceId,
}

#[derive(Args)]
pub struct PortfolioArgs {
    pub owner: String,
}

#[derive(Args)]
pub struct ChallengeArgs {
    #[command(subcommand)]
    pub action: ChallengeAction,
}

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Register a prompt and score a transcript against it
    Check {
        #[arg(long)]
        text: String,
        #[arg(long)]
        transcript: String,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mint_defaults() {
        let cli = Cli::try_parse_from(["vn", "mint", "--owner", "0xabc", "--title", "Narrator"])
            .unwrap();
        if let Command::Mint(args) = cli.command {
            assert_eq!(args.owner, "0xabc");
            assert_eq!(args.royalty_bps, 1000);
            assert_eq!(args.quota, 100);
            assert!(!args.commercial);
            assert!(args.sample.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_mint_full() {
        let cli = Cli::try_parse_from([
            "vn",
            "mint",
            "--owner",
            "0xabc",
            "--title",
            "Narrator",
            "--description",
            "warm",
            "--royalty-bps",
            "250",
            "--commercial",
            "--quota",
            "3",
            "--terms",
            "cc-by",
            "--sample",
            "a.wav",
        ])
        .unwrap();
        if let Command::Mint(args) = cli.command {
            assert_eq!(args.royalty_bps, 250);
            assert!(args.commercial);
            assert_eq!(args.quota, 3);
            assert_eq!(args.sample.as_deref(), Some("a.wav"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_synthesize() {
        let id = VoiceId::new();
        let cli = Cli::try_parse_from([
            "vn",
            "synthesize",
            &id.to_string(),
            "--requester",
            "0xdef",
            "--text",
            "hello",
            "--commercial",
        ])
        .unwrap();
        if let Command::Synthesize(args) = cli.command {
            assert_eq!(args.voice_id, id);
            assert!(args.commercial);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn reject_malformed_voice_id() {
        assert!(Cli::try_parse_from(["vn", "show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vn", "voices", "--memory", "--format", "json", "-v"])
            .unwrap();
        assert!(cli.memory);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn data_dir_conflicts_with_memory() {
        assert!(Cli::try_parse_from(["vn", "voices", "--memory", "--data-dir", "/tmp/x"]).is_err());
    }

    #[test]
    fn parse_challenge_check() {
        let cli = Cli::try_parse_from([
            "vn",
            "challenge",
            "check",
            "--text",
            "say this",
            "--transcript",
            "say this",
        ])
        .unwrap();
        if let Command::Challenge(ChallengeArgs {
            action: ChallengeAction::Check { threshold, .. },
        }) = cli.command
        {
            assert_eq!(threshold, DEFAULT_THRESHOLD);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_royalties_limit() {
        let cli = Cli::try_parse_from(["vn", "royalties", "-n", "5"]).unwrap();
        if let Command::Royalties(args) = cli.command {
            assert_eq!(args.limit, Some(5));
        } else {
            panic!("wrong command");
        }
    }
}
