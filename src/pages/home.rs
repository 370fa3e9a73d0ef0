use leptos::prelude::*;
use log::info;

use crate::components::relation_graph::{GraphVariant, Record, RelationGraph};

fn sample_notes() -> Vec<Record> {
	vec![
		Record::new("1", "Revolução Industrial")
			.with_content("Causada por [[Máquina a Vapor]]; ver também [[Iluminismo]]."),
		Record::new("2", "Máquina a Vapor").with_content("Base da [[Revolução Industrial]]."),
		Record::new("3", "Iluminismo").with_content("Influenciou a [[Revolução Francesa]]."),
		Record::new("4", "Revolução Francesa"),
		Record::new("5", "Funções do 2º grau").with_content("Gráfico é uma parábola."),
		Record::new("6", "Redação: proposta de intervenção")
			.with_content("Agente, ação, meio, finalidade e detalhamento."),
	]
}

fn sample_tags() -> Vec<Record> {
	[
		("matematica", "Matemática", 42.0),
		("redacao", "Redação", 35.0),
		("historia", "História", 18.0),
		("biologia", "Biologia", 12.0),
		("fisica", "Física", 9.0),
		("quimica", "Química", 7.0),
		("geografia", "Geografia", 5.0),
		("literatura", "Literatura", 3.0),
		("filosofia", "Filosofia", 2.0),
		("ingles", "Inglês", 1.0),
		("sociologia", "Sociologia", 1.0),
	]
	.into_iter()
	.map(|(id, title, posts)| Record::new(id, title).with_weight(posts))
	.collect()
}

/// A new note whose content links back to `source_id`'s title.
fn linked_note(notes: &[Record], source_id: &str) -> Option<Record> {
	let source = notes.iter().find(|n| n.id == source_id)?;
	let n = notes.len() + 1;
	Some(
		Record::new(format!("nova-{n}"), format!("Nova nota {n}"))
			.with_content(format!("Conectada a [[{}]]", source.title)),
	)
}

fn toggle_selection(selected: &mut Vec<String>, id: String) {
	if let Some(pos) = selected.iter().position(|s| *s == id) {
		selected.remove(pos);
	} else {
		selected.push(id);
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (notes, set_notes) = signal(sample_notes());
	let (tags, _) = signal(sample_tags());
	let (selected_tags, set_selected_tags) = signal(Vec::<String>::new());
	let (opened, set_opened) = signal(None::<String>);

	let on_node_open = Callback::new(move |id: String| {
		info!("opening note {id}");
		set_opened.set(Some(id));
	});
	let on_create_connection = Callback::new(move |source_id: String| {
		set_notes.update(|notes| {
			if let Some(note) = linked_note(notes, &source_id) {
				info!("created {} linked to {source_id}", note.id);
				notes.push(note);
			}
		});
	});
	let on_toggle = Callback::new(move |id: String| {
		set_selected_tags.update(|selected| toggle_selection(selected, id));
	});

	let opened_title = move || {
		let id = opened.get()?;
		notes.with(|notes| notes.iter().find(|n| n.id == id).map(|n| n.title.clone()))
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<section class="graph-panel">
					<h2>"Minhas notas"</h2>
					<p class="subtitle">
						{move || {
							opened_title()
								.map(|title| format!("Nota aberta: {title}"))
								.unwrap_or_else(|| "Clique em uma nota para abrir ou conectar.".into())
						}}
					</p>
					<div class="graph-container">
						<RelationGraph
							records=notes
							variant=GraphVariant::Notes
							on_node_open=on_node_open
							on_create_connection=on_create_connection
						/>
					</div>
				</section>
				<section class="graph-panel">
					<h2>"Temas da comunidade"</h2>
					<p class="subtitle">
						{move || format!("{} tema(s) selecionado(s)", selected_tags.get().len())}
					</p>
					<div class="graph-container">
						<RelationGraph
							records=tags
							variant=GraphVariant::Tags
							selected=selected_tags
							on_toggle=on_toggle
						/>
					</div>
				</section>
			</div>
		</ErrorBoundary>
	}
}
