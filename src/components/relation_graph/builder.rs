//! Turns host records into the node/link arena.

use glam::DVec2;
use log::debug;
use rand::Rng;

use super::params::{TAG_RADIUS_MAX, TAG_RADIUS_MIN};
use super::types::{GraphData, GraphLink, GraphNode, GraphVariant, Record};

pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const WEIGHT_SCALE: f64 = 4.0;

pub fn build_graph<R: Rng + ?Sized>(
	records: &[Record],
	variant: GraphVariant,
	width: f64,
	height: f64,
	rng: &mut R,
) -> GraphData {
	let node_radius = variant.params().node_radius;
	let nodes: Vec<GraphNode> = records
		.iter()
		.enumerate()
		.map(|(i, record)| {
			let (radius, color) = match variant {
				GraphVariant::Notes => (node_radius, None),
				GraphVariant::Tags => (tag_radius(record, rng), Some(COLORS[i % COLORS.len()])),
			};
			GraphNode {
				id: record.id.clone(),
				label: record.title.clone(),
				position: DVec2::new(uniform(rng, width), uniform(rng, height)),
				velocity: DVec2::ZERO,
				radius,
				color,
			}
		})
		.collect();
	let links = derive_links(records);

	debug!(
		"built {:?} graph: {} nodes, {} links",
		variant,
		nodes.len(),
		links.len()
	);
	GraphData { nodes, links }
}

/// Every `A -> B` where `A`'s content contains `[[B.title]]` literally.
///
/// Mutual references yield two links; self references yield none.
pub fn derive_links(records: &[Record]) -> Vec<GraphLink> {
	let needles: Vec<String> = records
		.iter()
		.map(|record| format!("[[{}]]", record.title))
		.collect();

	let mut links = Vec::new();
	for (source, record) in records.iter().enumerate() {
		let Some(content) = record.content.as_deref() else {
			continue;
		};
		for (target, needle) in needles.iter().enumerate() {
			if source != target && content.contains(needle.as_str()) {
				links.push(GraphLink { source, target });
			}
		}
	}
	links
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
	if extent.is_finite() && extent > 0.0 {
		rng.gen_range(0.0..extent)
	} else {
		0.0
	}
}

fn tag_radius<R: Rng + ?Sized>(record: &Record, rng: &mut R) -> f64 {
	match record.weight {
		Some(weight) if weight.is_finite() && weight >= 0.0 => {
			(TAG_RADIUS_MIN + weight.sqrt() * WEIGHT_SCALE).min(TAG_RADIUS_MAX)
		}
		_ => rng.gen_range(TAG_RADIUS_MIN..TAG_RADIUS_MAX),
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn note(id: &str, title: &str, content: &str) -> Record {
		Record::new(id, title).with_content(content)
	}

	#[test]
	fn wiki_link_produces_one_directed_link() {
		let records = vec![
			note("1", "Revolução Industrial", "Causada por [[Máquina a Vapor]]"),
			note("2", "Máquina a Vapor", ""),
		];
		let mut rng = SmallRng::seed_from_u64(7);
		let data = build_graph(&records, GraphVariant::Notes, 800.0, 600.0, &mut rng);

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.link_ids(), vec![("1", "2")]);
	}

	#[test]
	fn reverse_link_requires_reverse_reference() {
		let one_way = vec![note("a", "A", "see [[B]]"), note("b", "B", "nothing here")];
		assert_eq!(
			derive_links(&one_way),
			vec![GraphLink {
				source: 0,
				target: 1
			}]
		);

		let mutual = vec![note("a", "A", "see [[B]]"), note("b", "B", "back to [[A]]")];
		assert_eq!(
			derive_links(&mutual),
			vec![
				GraphLink {
					source: 0,
					target: 1
				},
				GraphLink {
					source: 1,
					target: 0
				},
			]
		);
	}

	#[test]
	fn self_reference_is_ignored() {
		let records = vec![note("a", "Óptica", "revisar [[Óptica]] amanhã")];
		assert!(derive_links(&records).is_empty());
	}

	#[test]
	fn titles_match_literally() {
		let records = vec![
			note("a", "Funções", "ver [[f(x) = x^2 + 1?]] e [[.*]]"),
			note("b", "f(x) = x^2 + 1?", ""),
			note("c", "Qualquer", ""),
		];
		assert_eq!(
			derive_links(&records),
			vec![GraphLink {
				source: 0,
				target: 1
			}]
		);
	}

	#[test]
	fn missing_content_can_still_be_a_target() {
		let records = vec![Record::new("a", "Sem conteúdo"), note("b", "B", "[[Sem conteúdo]]")];
		assert_eq!(
			derive_links(&records),
			vec![GraphLink {
				source: 1,
				target: 0
			}]
		);
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let mut rng = SmallRng::seed_from_u64(1);
		let data = build_graph(&[], GraphVariant::Tags, 800.0, 600.0, &mut rng);
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
	}

	#[test]
	fn rebuild_keeps_link_set() {
		let records = vec![
			note("1", "Brasil Colônia", "[[Ciclo do Ouro]] e [[Ciclo da Cana]]"),
			note("2", "Ciclo do Ouro", "depois do [[Ciclo da Cana]]"),
			note("3", "Ciclo da Cana", "[[Brasil Colônia]]"),
		];
		let first = build_graph(
			&records,
			GraphVariant::Notes,
			640.0,
			480.0,
			&mut SmallRng::seed_from_u64(1),
		);
		let second = build_graph(
			&records,
			GraphVariant::Notes,
			640.0,
			480.0,
			&mut SmallRng::seed_from_u64(2),
		);

		assert_eq!(first.links, second.links);
		assert_ne!(first.nodes[0].position, second.nodes[0].position);
	}

	#[test]
	fn nodes_start_inside_canvas_at_rest() {
		let records: Vec<Record> = (0..50).map(|i| Record::new(i.to_string(), format!("Nota {i}"))).collect();
		let mut rng = SmallRng::seed_from_u64(3);
		let data = build_graph(&records, GraphVariant::Notes, 300.0, 200.0, &mut rng);

		for node in &data.nodes {
			assert!((0.0..300.0).contains(&node.position.x));
			assert!((0.0..200.0).contains(&node.position.y));
			assert_eq!(node.velocity, DVec2::ZERO);
			assert_eq!(node.color, None);
		}
	}

	#[test]
	fn tag_colors_cycle_and_weights_size_nodes() {
		let records: Vec<Record> = (0..12)
			.map(|i| Record::new(format!("tag-{i}"), format!("#{i}")).with_weight(i as f64))
			.collect();
		let mut rng = SmallRng::seed_from_u64(4);
		let data = build_graph(&records, GraphVariant::Tags, 800.0, 600.0, &mut rng);

		assert_eq!(data.nodes[0].color, Some(COLORS[0]));
		assert_eq!(data.nodes[10].color, Some(COLORS[0]));
		assert_eq!(data.nodes[11].color, Some(COLORS[1]));
		assert_eq!(data.nodes[0].radius, TAG_RADIUS_MIN);
		assert!(data.nodes[9].radius > data.nodes[1].radius);
		assert!(data.nodes.iter().all(|n| n.radius <= TAG_RADIUS_MAX));
	}

	#[test]
	fn unweighted_tags_get_random_radius_in_range() {
		let records: Vec<Record> = (0..20).map(|i| Record::new(i.to_string(), "t")).collect();
		let mut rng = SmallRng::seed_from_u64(5);
		let data = build_graph(&records, GraphVariant::Tags, 800.0, 600.0, &mut rng);

		assert!(
			data.nodes
				.iter()
				.all(|n| (TAG_RADIUS_MIN..TAG_RADIUS_MAX).contains(&n.radius))
		);
	}

	#[test]
	fn zero_sized_canvas_places_nodes_at_origin() {
		let records = vec![Record::new("a", "A")];
		let mut rng = SmallRng::seed_from_u64(6);
		let data = build_graph(&records, GraphVariant::Notes, 0.0, f64::NAN, &mut rng);
		assert_eq!(data.nodes[0].position, DVec2::ZERO);
	}
}
