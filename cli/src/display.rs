use soundpath_core::{
    ArtistInfo, ExploreOutcome, ExploreResult, PathNode, PathOutcome, PathResult, SearchStats,
    SubgraphNode,
};

use crate::args::Args;
use crate::colors::ColorScheme;
use crate::utils::format_number;

pub fn search_info(from: &ArtistInfo, to: Option<&ArtistInfo>, args: &Args, colors: &ColorScheme) {
    match to {
        Some(to) => println!(
            "🎵 Finding path from {} to {}",
            colors.artist_name(&format!("\"{}\"", from.name)),
            colors.artist_name(&format!("\"{}\"", to.name))
        ),
        None => println!(
            "🎧 Exploring {} {}",
            if args.reverse {
                "artists pointing at"
            } else {
                "the neighborhood of"
            },
            colors.artist_name(&format!("\"{}\"", from.name))
        ),
    }

    if args.weighted {
        println!("⚙️  Using weighted pathfinding (Dijkstra)");
    } else {
        println!("⚙️  Using shortest hop pathfinding (BFS)");
    }

    if let Some(min_match) = args.min_match {
        if min_match > 0.0 {
            println!(
                "⚡ Filtering connections with similarity >= {}",
                colors.number(&format!("{min_match:.2}"))
            );
        }
    }
    if let Some(top_related) = args.top_related {
        println!(
            "🔝 Using top {} connections per artist",
            colors.number(&top_related.to_string())
        );
    }

    println!("🔍 Searching...");
}

pub fn path_result(
    from: &ArtistInfo,
    to: &ArtistInfo,
    result: &PathResult,
    args: &Args,
    colors: &ColorScheme,
) {
    if args.verbose {
        println!("\n---\n");
    }

    match (result.outcome, &result.path) {
        (PathOutcome::Found, Some(path)) => {
            display_successful_path(path, args, colors);
        }
        (PathOutcome::BudgetExhausted, _) => {
            println!(
                "{} no path within a budget of {} visited artists - try raising --budget \
                 or lowering --min-match",
                colors.error("❌"),
                colors.number(&format_number(result.stats.artists_visited))
            );
        }
        (PathOutcome::Cancelled, _) => {
            println!("{}", colors.error("⏱ Search cancelled before completion"));
        }
        _ => {
            println!(
                "{} {} and {}",
                colors.error("❌ No path found between"),
                colors.artist_name(&format!("\"{}\"", from.name)),
                colors.artist_name(&format!("\"{}\"", to.name))
            );
        }
    }

    if args.verbose {
        statistics(&result.stats, colors);
    }
}

fn display_successful_path(path: &[PathNode], args: &Args, colors: &ColorScheme) {
    if args.verbose {
        println!(
            "{} Found path with {} steps:\n",
            colors.success("✅"),
            colors.number(&(path.len().saturating_sub(1)).to_string())
        );
    }

    let path_flow = path
        .iter()
        .map(|node| colors.artist_name(&format!("\"{}\"", node.name)).to_string())
        .collect::<Vec<_>>()
        .join(" → ");
    println!("{path_flow}");

    if !args.quiet {
        println!();
        for (index, node) in path.iter().enumerate() {
            println!("{}", format_path_step(index + 1, node, args, colors));
        }
    }
}

pub fn format_path_step(
    step_number: usize,
    node: &PathNode,
    args: &Args,
    colors: &ColorScheme,
) -> String {
    let mut line = format!(
        "{} {}",
        colors.step_number(&format!("{step_number}.")),
        colors.artist_name(&node.name)
    );
    if args.show_similarity {
        if let Some(similarity) = node.similarity {
            line.push_str(&format!(
                " {}",
                colors.similarity(&format!("({similarity:.2})"))
            ));
        }
    }
    if args.show_ids {
        line.push_str(&format!(" [{}]", node.id));
    }
    if !args.hide_urls {
        line.push_str(&format!("\n   {}", colors.url(&node.url)));
    }
    line
}

pub fn explore_result(result: &ExploreResult, args: &Args, colors: &ColorScheme) {
    if args.verbose {
        println!("\n---\n");
    }
    if result.outcome == ExploreOutcome::Cancelled {
        println!(
            "{}",
            colors.error("⏱ Exploration cancelled before completion")
        );
    }

    let direction = if args.reverse { "pointing at" } else { "around" };
    println!(
        "🎧 {} artists {} {}:\n",
        colors.number(&result.subgraph.nodes.len().to_string()),
        direction,
        colors.artist_name(&format!("\"{}\"", result.root.name))
    );

    let mut nodes: Vec<&SubgraphNode> = result.subgraph.nodes.iter().collect();
    if args.weighted {
        nodes.sort_by(|a, b| {
            a.cost
                .partial_cmp(&b.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
    } else {
        nodes.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.name.cmp(&b.name)));
    }

    for node in nodes {
        println!("{}", format_explore_node(node, args, colors));
    }

    println!(
        "\n🔗 {} connections among them",
        colors.number(&format_number(result.subgraph.edges.len()))
    );

    if args.verbose {
        statistics(&result.stats, colors);
    }
}

pub fn format_explore_node(node: &SubgraphNode, args: &Args, colors: &ColorScheme) -> String {
    let badge = match (node.layer, node.cost) {
        (Some(layer), _) => format!("[hop {layer}]"),
        (_, Some(cost)) => format!("[cost {cost:.2}]"),
        _ => String::new(),
    };
    let mut line = format!(
        "{} {}",
        colors.step_number(&badge),
        colors.artist_name(&node.name)
    );
    if args.show_ids {
        line.push_str(&format!(" [{}]", node.id));
    }
    if !args.hide_urls {
        line.push_str(&format!("\n   {}", colors.url(&node.url)));
    }
    line
}

fn statistics(stats: &SearchStats, colors: &ColorScheme) {
    println!(
        "\n{}",
        colors.stats(&format!(
            "📊 Visited {} artists, considered {} edges in {} ms",
            format_number(stats.artists_visited),
            format_number(stats.edges_considered),
            stats.duration_ms
        ))
    );
}
