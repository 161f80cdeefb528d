use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use coseek::{
	HttpLookup, JsonFileStore, KeyValueStore, MemoryStore, Navigation, QueryDispatcher, QueryState,
	RecencyStore, SearchPhase, SearchSession, SearchableEntity, SelectionCommitter, SelectionSlot,
	ViewModel, reconcile, recommended_companies,
};

use crate::cli::{CliCommand, Report};
use crate::settings::{ResolvedConfig, StorageTarget};

/// Coordinates the store, the lookup client and the search surface for one
/// command invocation.
pub(crate) struct SearchWorkflow {
	config: ResolvedConfig,
	store: Box<dyn KeyValueStore>,
}

impl SearchWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
		let store: Box<dyn KeyValueStore> = match &config.storage {
			StorageTarget::File(path) => {
				tracing::debug!(path = %path.display(), "using file storage");
				Box::new(JsonFileStore::new(path.clone()))
			}
			StorageTarget::Ephemeral => Box::new(MemoryStore::new()),
		};
		Ok(Self { config, store })
	}

	pub(crate) fn run(self, command: CliCommand) -> Result<Report> {
		match command {
			CliCommand::Search { query, pick } => self.search(&query, pick),
			CliCommand::Suggestions => Ok(self.suggestions()),
			CliCommand::Recent => Ok(self.recent()),
			CliCommand::Select { name, id, url } => {
				let entity = CliCommand::entity(&name, id.as_deref(), url.as_deref());
				Ok(self.select(&entity))
			}
			CliCommand::Selected => Ok(Report::Selected {
				name: SelectionSlot::read_or_default(&self.store),
			}),
		}
	}

	/// Type `query` into a fresh surface and wait for it to settle.
	fn search(&self, query: &str, pick: Option<usize>) -> Result<Report> {
		let lookup = HttpLookup::new(&self.config.base_url, self.config.timeout)
			.context("failed to build the lookup client")?;
		let dispatcher = QueryDispatcher::spawn(lookup, self.config.debounce);

		let navigated: Rc<RefCell<Option<Navigation>>> = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&navigated);
		let mut session = SearchSession::new(dispatcher, &self.store, move |target: Navigation| {
			*sink.borrow_mut() = Some(target);
		});

		session.on_input(query, Instant::now());
		let phase = session.settle(self.config.settle_timeout);
		if matches!(phase, SearchPhase::Typing | SearchPhase::Loading) {
			tracing::warn!(
				query,
				timeout_secs = self.config.settle_timeout.as_secs(),
				"search did not settle in time"
			);
		}

		if let Some(pick) = pick {
			let entity = nth_result(&session.view(), pick)
				.with_context(|| format!("no result number {pick} for '{query}'"))?;
			session.select(&entity);
		}

		let navigation = navigated.borrow_mut().take();
		Ok(Report::from_view(
			&session.query().raw_text,
			session.phase(),
			&session.view(),
			navigation,
		))
	}

	fn suggestions(&self) -> Report {
		let recency = RecencyStore::open(&self.store);
		let recommended = recommended_companies();
		let query = QueryState::default();
		let view = reconcile(&query, recency.entries(), &recommended);
		Report::from_view("", SearchPhase::Idle, &view, None)
	}

	fn recent(&self) -> Report {
		Report::Entities {
			entries: RecencyStore::open(&self.store).entries().to_vec(),
		}
	}

	fn select(&self, entity: &SearchableEntity) -> Report {
		let mut committer = SelectionCommitter::new(RecencyStore::open(&self.store));
		let mut navigated = None;
		committer.select(entity, &mut |target: Navigation| navigated = Some(target));
		Report::Navigation(navigated.unwrap_or_else(|| Navigation::from(entity)))
	}
}

/// The 1-based `pick` among the settled results.
fn nth_result(view: &ViewModel<'_>, pick: usize) -> Result<SearchableEntity> {
	let ViewModel::Results { results } = *view else {
		bail!("the search returned no results");
	};
	match pick.checked_sub(1).and_then(|index| results.get(index)) {
		Some(entity) => Ok(entity.clone()),
		None => bail!("only {} result(s) available", results.len()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn workflow() -> SearchWorkflow {
		SearchWorkflow {
			config: ResolvedConfig {
				base_url: "http://127.0.0.1:9".into(),
				timeout: None,
				debounce: std::time::Duration::from_millis(1),
				settle_timeout: std::time::Duration::from_secs(1),
				storage: StorageTarget::Ephemeral,
				config_files: Vec::new(),
			},
			store: Box::new(MemoryStore::new()),
		}
	}

	#[test]
	fn select_then_recent_and_selected() {
		let workflow = workflow();
		let entity = CliCommand::entity("Infosys", Some("10"), Some("/company/INFY/consolidated/"));

		let report = workflow.select(&entity);
		assert_eq!(
			report,
			Report::Navigation(Navigation {
				url: Some("/company/INFY/consolidated/".into()),
				name: "Infosys".into(),
			})
		);

		assert_eq!(
			workflow.recent(),
			Report::Entities {
				entries: vec![entity],
			}
		);
		assert_eq!(
			SelectionSlot::read_or_default(&workflow.store),
			"Infosys".to_owned()
		);
	}

	#[test]
	fn suggestions_start_with_recent_picks() {
		let workflow = workflow();
		workflow.select(&SearchableEntity::named("Banks and NBFC"));

		let Report::View {
			state, sections, ..
		} = workflow.suggestions()
		else {
			panic!("expected a view");
		};
		assert_eq!(state, "suggestions");
		assert_eq!(sections[0].entries[0].name, "Banks and NBFC");
		assert_eq!(sections[1].entries.len(), 10);
	}

	#[test]
	fn selected_falls_back_to_the_dashboard_default() {
		let report = workflow().run(CliCommand::Selected).expect("run");
		assert_eq!(
			report,
			Report::Selected {
				name: "Banks and NBFC".into(),
			}
		);
	}

	#[test]
	fn picks_are_one_based_and_bounded() {
		let results = vec![
			SearchableEntity::named("Tata Motors"),
			SearchableEntity::named("Tata Steel"),
		];
		let view = ViewModel::Results { results: &results };

		assert_eq!(nth_result(&view, 2).expect("second").name, "Tata Steel");
		assert!(nth_result(&view, 0).is_err());
		assert!(nth_result(&view, 3).is_err());
		assert!(nth_result(&ViewModel::NoResults, 1).is_err());
	}
}
