use clap::{Args, Parser, Subcommand};
use readlog::model::{Format, Language};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "readlog")]
#[command(about = "Keep a log of the books you read", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep data here instead of the user data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book
    #[command(alias = "a")]
    Add(AddArgs),

    /// List books, most recently updated first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show everything about one book
    #[command(alias = "v")]
    Show {
        /// List index or id (prefix) of the book
        selector: String,
    },

    /// Change fields of a book
    #[command(alias = "e")]
    Edit {
        /// List index or id (prefix) of the book
        selector: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// List index or id (prefix) of the book
        selector: String,
    },

    /// Known vibes and how often they were used
    Tags,

    /// Suggest vibes for a prefix
    Suggest {
        /// What has been typed so far
        #[arg(default_value = "")]
        prefix: String,

        /// Leave out a vibe already on the book (repeatable)
        #[arg(long = "exclude", value_name = "VIBE")]
        exclude: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub author: String,

    #[arg(long, default_value = "")]
    pub genre: String,

    /// Page count
    #[arg(long, default_value_t = 0)]
    pub pages: u32,

    /// English or Swedish
    #[arg(long, default_value_t = Language::English)]
    pub language: Language,

    /// E-book, Physical or Audio
    #[arg(long, default_value_t = Format::Physical)]
    pub format: Format,

    /// A vibe tag (repeatable)
    #[arg(long = "vibe", value_name = "VIBE")]
    pub vibes: Vec<String>,

    /// 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub rating: Option<u8>,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Did not finish
    #[arg(long)]
    pub dnf: bool,

    /// Pages read before giving up
    #[arg(long, requires = "dnf")]
    pub pages_read: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub language: Option<Language>,

    #[arg(long)]
    pub format: Option<Format>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub rating: Option<u8>,
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub pages: Option<u32>,

    #[arg(long)]
    pub language: Option<Language>,

    #[arg(long)]
    pub format: Option<Format>,

    /// Replace the vibes with these (repeatable)
    #[arg(long = "vibe", value_name = "VIBE", conflicts_with = "clear_vibes")]
    pub vibes: Vec<String>,

    /// Remove all vibes
    #[arg(long)]
    pub clear_vibes: bool,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub rating: Option<u8>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Mark as not finished
    #[arg(long, conflicts_with = "finished")]
    pub dnf: bool,

    /// Mark as finished, forgetting pages read
    #[arg(long, conflicts_with = "pages_read")]
    pub finished: bool,

    #[arg(long)]
    pub pages_read: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_repeated_vibes() {
        let cli = Cli::try_parse_from([
            "readlog", "add", "--title", "Dune", "--vibe", "Epic", "--vibe", "Desert",
            "--format", "audio", "--rating", "9",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.title, "Dune");
                assert_eq!(args.vibes, vec!["Epic", "Desert"]);
                assert_eq!(args.format, Format::Audio);
                assert_eq!(args.rating, Some(9));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["readlog", "add", "--title", "X", "--rating", "11"]).is_err());
        assert!(Cli::try_parse_from(["readlog", "add", "--title", "X", "--rating", "0"]).is_err());
    }

    #[test]
    fn pages_read_needs_dnf_on_add() {
        assert!(
            Cli::try_parse_from(["readlog", "add", "--title", "X", "--pages-read", "10"]).is_err()
        );
    }

    #[test]
    fn edit_flags_conflict() {
        assert!(Cli::try_parse_from(["readlog", "edit", "1", "--dnf", "--finished"]).is_err());
        assert!(
            Cli::try_parse_from(["readlog", "edit", "1", "--vibe", "A", "--clear-vibes"]).is_err()
        );
    }

    #[test]
    fn aliases_and_global_flags() {
        let cli = Cli::try_parse_from(["readlog", "ls", "--data-dir", "/tmp/x", "-v"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List(_))));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
    }
}
