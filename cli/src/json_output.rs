use serde::Serialize;
use uuid::Uuid;

use soundpath_core::{ArtistInfo, ExploreResult, PathOutcome, PathResult};

use crate::args::Args;

#[derive(Serialize)]
pub struct PathDocument {
    pub query: JsonQuery,
    pub result: JsonPathResult,
    pub stats: JsonStats,
}

#[derive(Serialize)]
pub struct JsonQuery {
    pub from: String,
    pub to: String,
    pub options: JsonOptions,
}

#[derive(Serialize)]
pub struct JsonOptions {
    pub algorithm: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_match: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_related: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<usize>,
}

#[derive(Serialize)]
pub struct JsonPathResult {
    pub outcome: PathOutcome,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonArtist>>,
}

#[derive(Serialize)]
pub struct JsonArtist {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_to_previous: Option<f32>,
}

#[derive(Serialize)]
pub struct JsonStats {
    pub search_time_ms: u64,
    pub artists_visited: usize,
    pub edges_considered: usize,
}

fn options(args: &Args) -> JsonOptions {
    JsonOptions {
        algorithm: args.algorithm().as_str(),
        min_match: args.min_match,
        top_related: args.top_related,
        budget: args.budget,
    }
}

pub fn path_document(
    from: &ArtistInfo,
    to: &ArtistInfo,
    result: &PathResult,
    args: &Args,
) -> PathDocument {
    let path = result.path.as_ref().map(|path| {
        path.iter()
            .map(|node| JsonArtist {
                name: node.name.clone(),
                url: node.url.clone(),
                id: args.show_ids.then_some(node.id),
                similarity_to_previous: node.similarity,
            })
            .collect()
    });

    PathDocument {
        query: JsonQuery {
            from: from.name.clone(),
            to: to.name.clone(),
            options: options(args),
        },
        result: JsonPathResult {
            outcome: result.outcome,
            found: result.outcome == PathOutcome::Found,
            path,
        },
        stats: JsonStats {
            search_time_ms: result.stats.duration_ms,
            artists_visited: result.stats.artists_visited,
            edges_considered: result.stats.edges_considered,
        },
    }
}

pub fn explore_document(result: &ExploreResult, args: &Args) -> serde_json::Value {
    serde_json::json!({
        "query": {
            "artist": result.root.name,
            "direction": if args.reverse { "reverse" } else { "forward" },
            "options": options(args),
        },
        "result": result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use soundpath_core::{PathNode, SearchStats, Subgraph};

    fn sample_result() -> PathResult {
        PathResult {
            outcome: PathOutcome::Found,
            path: Some(vec![
                PathNode {
                    id: Uuid::from_u128(1),
                    name: "Seefeel".to_owned(),
                    url: "https://www.last.fm/music/Seefeel".to_owned(),
                    similarity: None,
                },
                PathNode {
                    id: Uuid::from_u128(2),
                    name: "Bark Psychosis".to_owned(),
                    url: "https://www.last.fm/music/Bark+Psychosis".to_owned(),
                    similarity: Some(0.61),
                },
            ]),
            subgraph: Subgraph::default(),
            stats: SearchStats {
                duration_ms: 12,
                artists_visited: 5,
                edges_considered: 9,
            },
        }
    }

    fn artist(id: u128, name: &str) -> ArtistInfo {
        ArtistInfo {
            id: Uuid::from_u128(id),
            name: name.to_owned(),
            url: format!("https://www.last.fm/music/{name}"),
        }
    }

    #[test]
    fn path_document_echoes_query_and_stats() {
        let args = Args::try_parse_from(["soundpath", "Seefeel", "Bark Psychosis", "-w"]).unwrap();
        let document = path_document(
            &artist(1, "Seefeel"),
            &artist(2, "Bark Psychosis"),
            &sample_result(),
            &args,
        );
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["query"]["from"], "Seefeel");
        assert_eq!(value["query"]["options"]["algorithm"], "dijkstra");
        assert_eq!(value["result"]["found"], true);
        assert_eq!(value["result"]["outcome"], "found");
        assert_eq!(value["result"]["path"][1]["similarity_to_previous"], 0.61);
        assert!(value["result"]["path"][0].get("id").is_none());
        assert_eq!(value["stats"]["search_time_ms"], 12);
        assert_eq!(value["stats"]["artists_visited"], 5);
    }

    #[test]
    fn ids_appear_only_when_requested() {
        let args =
            Args::try_parse_from(["soundpath", "Seefeel", "Bark Psychosis", "--show-ids"]).unwrap();
        let document = path_document(
            &artist(1, "Seefeel"),
            &artist(2, "Bark Psychosis"),
            &sample_result(),
            &args,
        );
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value["result"]["path"][0]["id"],
            Uuid::from_u128(1).to_string()
        );
    }
}
