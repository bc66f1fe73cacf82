use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use soundpath_core::{Algorithm, SearchOptions};

#[derive(Parser, Debug, Clone)]
#[command(name = "soundpath")]
#[command(about = "Find connection paths between music artists in a similarity graph")]
pub struct Args {
    /// First artist name (optional with --random)
    pub from: Option<String>,

    /// Second artist name; omit to explore the first artist's neighborhood
    pub to: Option<String>,

    /// Only use connections with similarity >= threshold (0.0-1.0)
    #[arg(short = 'm', long, value_name = "SIMILARITY")]
    pub min_match: Option<f32>,

    /// Limit to top N connections per artist
    #[arg(short = 't', long, value_name = "COUNT")]
    pub top_related: Option<usize>,

    /// Stop after visiting this many artists
    #[arg(short = 'b', long, value_name = "COUNT")]
    pub budget: Option<usize>,

    /// Abort the search after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Use weighted pathfinding for best similarity (default: shortest path)
    #[arg(short, long)]
    pub weighted: bool,

    /// Explore incoming edges instead of outgoing ones
    #[arg(long)]
    pub reverse: bool,

    /// Pick a random artist when no name is given
    #[arg(long)]
    pub random: bool,

    /// Directory containing graph.bin, rev-graph.bin and metadata.bin
    #[arg(long, value_name = "PATH")]
    pub data_path: Option<PathBuf>,

    /// Emit the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Hide artist URLs from output (URLs shown by default)
    #[arg(short = 'u', long)]
    pub hide_urls: bool,

    /// Show artist UUIDs in output
    #[arg(short = 'i', long)]
    pub show_ids: bool,

    /// Show similarity scores between connected artists
    #[arg(short = 's', long)]
    pub show_similarity: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose mode - show search info and statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - only show the path flow
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn algorithm(&self) -> Algorithm {
        if self.weighted {
            Algorithm::Dijkstra
        } else {
            Algorithm::Bfs
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            min_similarity: self.min_match,
            max_relations: self.top_related,
            budget: self.budget,
            deadline: self.timeout.map(Duration::from_secs_f64),
            cancel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_names_parse_as_a_path_query() {
        let args = Args::try_parse_from(["soundpath", "Radiohead", "Portishead"]).unwrap();
        assert_eq!(args.from.as_deref(), Some("Radiohead"));
        assert_eq!(args.to.as_deref(), Some("Portishead"));
        assert_eq!(args.algorithm(), Algorithm::Bfs);
    }

    #[test]
    fn weighted_flag_selects_dijkstra() {
        let args = Args::try_parse_from(["soundpath", "-w", "Radiohead", "Portishead"]).unwrap();
        assert_eq!(args.algorithm(), Algorithm::Dijkstra);
    }

    #[test]
    fn tuning_flags_land_in_search_options() {
        let args = Args::try_parse_from([
            "soundpath",
            "Radiohead",
            "-m",
            "0.3",
            "-t",
            "40",
            "-b",
            "500",
            "--timeout",
            "2.5",
        ])
        .unwrap();
        let options = args.search_options();
        assert_eq!(options.min_similarity, Some(0.3));
        assert_eq!(options.max_relations, Some(40));
        assert_eq!(options.budget, Some(500));
        assert_eq!(options.deadline, Some(Duration::from_secs_f64(2.5)));
    }

    #[test]
    fn omitted_tuning_defers_to_engine_defaults() {
        let args = Args::try_parse_from(["soundpath", "Radiohead"]).unwrap();
        let options = args.search_options();
        assert!(options.min_similarity.is_none());
        assert!(options.max_relations.is_none());
        assert!(options.budget.is_none());
        assert!(options.deadline.is_none());
    }

    #[test]
    fn random_exploration_needs_no_names() {
        let args = Args::try_parse_from(["soundpath", "--random", "--reverse"]).unwrap();
        assert!(args.from.is_none());
        assert!(args.random);
        assert!(args.reverse);
    }
}
