use std::fmt::Write;

use anyhow::Result;
use coseek::{Navigation, SearchPhase, SearchableEntity, ViewModel};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// A titled group of entities as the search surface lays them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Section {
	pub(crate) title: &'static str,
	pub(crate) entries: Vec<SearchableEntity>,
}

/// Everything a subcommand has to show once it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Report {
	/// The settled search surface.
	View {
		query: String,
		phase: SearchPhase,
		state: &'static str,
		sections: Vec<Section>,
		#[serde(skip_serializing_if = "Option::is_none")]
		navigation: Option<Navigation>,
	},
	/// A flat entity list, such as the recent selections.
	Entities { entries: Vec<SearchableEntity> },
	/// A committed selection.
	Navigation(Navigation),
	/// The company the dashboard opens with.
	Selected { name: String },
}

impl Report {
	/// Snapshot a borrowed view so it can outlive the session it came from.
	pub(crate) fn from_view(
		query: &str,
		phase: SearchPhase,
		view: &ViewModel<'_>,
		navigation: Option<Navigation>,
	) -> Self {
		let (state, sections) = match *view {
			ViewModel::Suggestions {
				recent,
				recommended,
			} => {
				let mut sections = Vec::with_capacity(2);
				if !recent.is_empty() {
					sections.push(Section {
						title: "Recent searches",
						entries: recent.to_vec(),
					});
				}
				sections.push(Section {
					title: "Recommended companies",
					entries: recommended.to_vec(),
				});
				("suggestions", sections)
			}
			ViewModel::Loading => ("loading", Vec::new()),
			ViewModel::Results { results } => (
				"results",
				vec![Section {
					title: "Search results",
					entries: results.to_vec(),
				}],
			),
			ViewModel::NoResults => ("no_results", Vec::new()),
		};

		Self::View {
			query: query.to_owned(),
			phase,
			state,
			sections,
			navigation,
		}
	}
}

/// Render a report as human readable text.
pub(crate) fn format_plain(report: &Report) -> String {
	let mut out = String::new();
	match report {
		Report::View {
			query,
			state,
			sections,
			navigation,
			..
		} => {
			if let Some(target) = navigation {
				write_navigation(&mut out, target);
				return out;
			}
			match *state {
				"loading" => {
					let _ = writeln!(out, "Searching... (query: '{query}')");
				}
				"no_results" => {
					let _ = writeln!(out, "No results found (query: '{query}')");
				}
				_ => {
					for (index, section) in sections.iter().enumerate() {
						if index > 0 {
							out.push('\n');
						}
						let _ = writeln!(out, "{}", section.title);
						write_table(&mut out, &section.entries);
					}
				}
			}
		}
		Report::Entities { entries } => {
			if entries.is_empty() {
				out.push_str("No recent searches\n");
			} else {
				write_table(&mut out, entries);
			}
		}
		Report::Navigation(target) => write_navigation(&mut out, target),
		Report::Selected { name } => {
			let _ = writeln!(out, "{name}");
		}
	}
	out
}

fn write_navigation(out: &mut String, target: &Navigation) {
	match &target.url {
		Some(url) => {
			let _ = writeln!(out, "Selected {} -> {url}", target.name);
		}
		None => {
			let _ = writeln!(out, "Selected {}", target.name);
		}
	}
}

/// Numbered rows with the name column padded to its widest display width.
fn write_table(out: &mut String, entries: &[SearchableEntity]) {
	let number_width = entries.len().to_string().len();
	let name_width = entries
		.iter()
		.map(|entity| entity.name.width())
		.max()
		.unwrap_or(0);

	for (index, entity) in entries.iter().enumerate() {
		let _ = write!(out, "  {:>number_width$}  {}", index + 1, entity.name);
		if let Some(url) = &entity.url {
			let padding = name_width - entity.name.width();
			let _ = write!(out, "{:padding$}  {url}", "");
		}
		out.push('\n');
	}
}

/// Format the report as a JSON string.
pub(crate) fn format_json(report: &Report) -> Result<String> {
	Ok(serde_json::to_string_pretty(report)?)
}

/// Print the plain-text representation of the report.
pub(crate) fn print_plain(report: &Report) {
	print!("{}", format_plain(report));
}

/// Print the JSON representation of the report.
pub(crate) fn print_json(report: &Report) -> Result<()> {
	println!("{}", format_json(report)?);
	Ok(())
}

#[cfg(test)]
mod tests {
	use coseek::{QueryState, reconcile, recommended_companies};
	use serde_json::Value;

	use super::*;

	fn settled(text: &str, results: Vec<SearchableEntity>) -> QueryState {
		QueryState {
			raw_text: text.into(),
			is_loading: false,
			results,
		}
	}

	#[test]
	fn suggestions_list_recent_before_recommended() {
		let recommended = recommended_companies();
		let recent = vec![SearchableEntity::named("Banks and NBFC")];
		let state = QueryState::default();
		let view = reconcile(&state, &recent, &recommended);
		let report = Report::from_view("", SearchPhase::Idle, &view, None);

		let text = format_plain(&report);
		let recent_at = text.find("Recent searches").expect("recent section");
		let recommended_at = text.find("Recommended companies").expect("recommended section");
		assert!(recent_at < recommended_at);
		assert!(text.contains("Banks and NBFC"));
	}

	#[test]
	fn suggestions_without_history_skip_the_recent_section() {
		let recommended = recommended_companies();
		let state = QueryState::default();
		let view = reconcile(&state, &[], &recommended);
		let report = Report::from_view("", SearchPhase::Idle, &view, None);

		assert!(!format_plain(&report).contains("Recent searches"));
	}

	#[test]
	fn urls_line_up_across_wide_names() {
		let entries = vec![
			SearchableEntity::named("日本").with_url("/a/"),
			SearchableEntity::named("abcdef").with_url("/b/"),
		];
		let mut out = String::new();
		write_table(&mut out, &entries);

		let columns: Vec<usize> = out
			.lines()
			.map(|line| {
				let at = line.find('/').expect("url");
				line[..at].width()
			})
			.collect();
		assert_eq!(columns[0], columns[1]);
	}

	#[test]
	fn empty_results_read_as_no_results() {
		let state = settled("zzzz", Vec::new());
		let view = reconcile(&state, &[], &[]);
		let report = Report::from_view("zzzz", SearchPhase::Ready, &view, None);
		assert_eq!(format_plain(&report), "No results found (query: 'zzzz')\n");
	}

	#[test]
	fn json_view_carries_state_and_phase() {
		let state = settled(
			"tata",
			vec![SearchableEntity::named("Tata Motors").with_id(6_i64)],
		);
		let view = reconcile(&state, &[], &[]);
		let report = Report::from_view("tata", SearchPhase::Ready, &view, None);

		let json = format_json(&report).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["kind"], "view");
		assert_eq!(value["state"], "results");
		assert_eq!(value["phase"], "ready");
		assert_eq!(value["sections"][0]["entries"][0]["id"], 6);
		assert!(value.get("navigation").is_none());
	}

	#[test]
	fn navigation_is_reported_with_its_url() {
		let target = Navigation {
			url: Some("/company/INFY/".into()),
			name: "Infosys".into(),
		};
		assert_eq!(
			format_plain(&Report::Navigation(target)),
			"Selected Infosys -> /company/INFY/\n"
		);
	}
}
