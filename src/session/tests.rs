use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use super::*;
use crate::search::{DEFAULT_DEBOUNCE, LookupCommand, LookupError, LookupResponse};
use crate::selection::{Navigation, SelectionSlot};
use crate::storage::{MemoryStore, RECENT_SEARCHES_KEY};
use crate::types::EntityId;

type Visits = Rc<std::cell::RefCell<Vec<Navigation>>>;

struct Surface {
	session: SearchSession<Rc<MemoryStore>, Box<dyn FnMut(Navigation)>>,
	store: Rc<MemoryStore>,
	visits: Visits,
	commands: Receiver<LookupCommand>,
	responses: Sender<LookupResponse>,
	start: Instant,
}

impl Surface {
	fn mount(store: MemoryStore) -> Self {
		let (command_tx, command_rx) = mpsc::channel();
		let (response_tx, response_rx) = mpsc::channel();
		let dispatcher = QueryDispatcher::with_channels(
			command_tx,
			response_rx,
			Arc::new(AtomicU64::new(0)),
			DEFAULT_DEBOUNCE,
		);
		let store = Rc::new(store);
		let visits: Visits = Rc::default();
		let sink = Rc::clone(&visits);
		let navigator: Box<dyn FnMut(Navigation)> =
			Box::new(move |nav| sink.borrow_mut().push(nav));
		Self {
			session: SearchSession::new(dispatcher, Rc::clone(&store), navigator),
			store,
			visits,
			commands: command_rx,
			responses: response_tx,
			start: Instant::now(),
		}
	}

	fn at(&self, millis: u64) -> Instant {
		self.start + Duration::from_millis(millis)
	}

	fn type_at(&mut self, text: &str, millis: u64) {
		let now = self.at(millis);
		self.session.on_input(text, now);
	}

	fn poll_at(&mut self, millis: u64) {
		let now = self.at(millis);
		self.session.poll(now);
	}

	/// Answer the newest issued query with `entities`.
	fn answer_latest(&mut self, entities: Vec<SearchableEntity>, millis: u64) {
		let (id, query) = self
			.commands
			.try_iter()
			.filter_map(|command| match command {
				LookupCommand::Query { id, query } => Some((id, query)),
				LookupCommand::Shutdown => None,
			})
			.last()
			.expect("a lookup was issued");
		self.responses
			.send(LookupResponse {
				id,
				query,
				entities,
				failed: false,
			})
			.unwrap();
		self.poll_at(millis);
	}
}

fn company(id: i64, name: &str) -> SearchableEntity {
	SearchableEntity::named(name)
		.with_id(id)
		.with_url(format!("/company/{id}/consolidated/"))
}

#[test]
fn fresh_surface_shows_recommendations_without_recent_section() {
	let surface = Surface::mount(MemoryStore::new());
	let view = surface.session.view();
	assert!(!view.shows_recent());
	assert_eq!(view.entries().count(), 10);
	assert_eq!(surface.session.phase(), SearchPhase::Idle);
}

#[test]
fn phases_follow_the_search_lifecycle() {
	let mut surface = Surface::mount(MemoryStore::new());
	surface.type_at("Tata", 0);
	assert_eq!(surface.session.phase(), SearchPhase::Typing);
	assert_eq!(surface.session.view(), ViewModel::NoResults);

	surface.poll_at(300);
	assert_eq!(surface.session.phase(), SearchPhase::Loading);
	assert_eq!(surface.session.view(), ViewModel::Loading);

	surface.answer_latest(vec![company(6, "Tata Motors")], 320);
	assert_eq!(surface.session.phase(), SearchPhase::Ready);

	surface.type_at("Tata M", 400);
	assert_eq!(surface.session.phase(), SearchPhase::Typing);

	surface.type_at("", 410);
	assert_eq!(surface.session.phase(), SearchPhase::Idle);
	assert!(surface.session.query().results.is_empty());
}

#[test]
fn selecting_commits_and_notifies_the_host() {
	let mut surface = Surface::mount(MemoryStore::new());
	surface.type_at("tata motors", 0);
	surface.poll_at(300);
	surface.answer_latest(vec![company(6, "Tata Motors")], 310);

	let picked = company(6, "Tata Motors");
	surface.session.select(&picked);

	assert_eq!(surface.session.phase(), SearchPhase::Committed);
	assert_eq!(surface.session.committed(), Some(&picked));
	assert_eq!(surface.session.recent(), &[picked.clone()]);
	assert_eq!(
		SelectionSlot::read(&surface.store).as_deref(),
		Some("Tata Motors")
	);
	assert_eq!(
		surface.visits.borrow().as_slice(),
		&[Navigation {
			url: Some("/company/6/consolidated/".into()),
			name: "Tata Motors".into(),
		}]
	);

	surface.type_at("ignored", 400);
	assert_eq!(surface.session.query().raw_text, "tata motors");
}

#[test]
fn reopening_resets_the_query_but_keeps_recent() {
	let mut surface = Surface::mount(MemoryStore::new());
	surface.session.select(&company(9, "HDFC Bank"));
	surface.session.open();

	assert_eq!(surface.session.phase(), SearchPhase::Idle);
	assert_eq!(surface.session.query(), &QueryState::default());
	let view = surface.session.view();
	assert!(view.shows_recent());
	assert_eq!(view.entries().next().map(|e| e.name.as_str()), Some("HDFC Bank"));
}

#[test]
fn submit_picks_the_first_result() {
	let mut surface = Surface::mount(MemoryStore::new());
	surface.type_at("tata", 0);
	surface.poll_at(300);
	surface.answer_latest(
		vec![company(6, "Tata Motors"), company(7, "Tata Steel")],
		310,
	);

	let picked = surface.session.submit();
	assert_eq!(picked.map(|e| e.name), Some("Tata Motors".to_owned()));
	assert_eq!(surface.visits.borrow().len(), 1);
	assert_eq!(surface.session.submit(), None);
}

#[test]
fn submit_without_results_does_nothing() {
	let mut surface = Surface::mount(MemoryStore::new());
	assert_eq!(surface.session.submit(), None);

	surface.type_at("qwerty", 0);
	surface.poll_at(300);
	assert_eq!(surface.session.submit(), None);

	surface.answer_latest(Vec::new(), 310);
	assert_eq!(surface.session.view(), ViewModel::NoResults);
	assert_eq!(surface.session.submit(), None);
	assert!(surface.visits.borrow().is_empty());
	assert_eq!(surface.store.get(RECENT_SEARCHES_KEY).unwrap(), None);
}

#[test]
fn recent_selections_are_loaded_once_at_mount() {
	let seeded = serde_json::to_string(&[company(1, "Reliance Industries Limited")]).unwrap();
	let mut surface = Surface::mount(MemoryStore::new().with_value(RECENT_SEARCHES_KEY, seeded));
	assert_eq!(surface.session.recent().len(), 1);

	surface.store.set(RECENT_SEARCHES_KEY, "[]").unwrap();
	surface.session.open();
	assert_eq!(surface.session.recent().len(), 1);
}

#[test]
fn recent_list_evicts_and_reorders_through_selections() {
	let mut surface = Surface::mount(MemoryStore::new());
	for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")] {
		surface.session.open();
		surface.session.select(&company(id, name));
	}
	surface.session.open();
	surface.session.select(&company(6, "F"));
	surface.session.open();
	surface.session.select(&company(3, "C"));

	let ids: Vec<_> = surface
		.session
		.recent()
		.iter()
		.filter_map(|entity| entity.id.as_ref().and_then(EntityId::as_i64))
		.collect();
	assert_eq!(ids, vec![3, 6, 5, 4, 2]);
}

#[test]
fn settle_drives_a_real_worker_to_ready() {
	let service = |query: &str| -> Result<Vec<SearchableEntity>, LookupError> {
		if query == "boom" {
			return Err(LookupError::Status(500));
		}
		Ok(vec![SearchableEntity::named(query.to_uppercase())])
	};
	let dispatcher = QueryDispatcher::spawn(service, Duration::from_millis(20));
	let mut session = SearchSession::new(dispatcher, MemoryStore::new(), |_: Navigation| {});

	session.on_input("infy", Instant::now());
	assert_eq!(session.settle(Duration::from_secs(5)), SearchPhase::Ready);
	assert_eq!(session.query().results, vec![SearchableEntity::named("INFY")]);

	session.on_input("boom", Instant::now());
	assert_eq!(session.settle(Duration::from_secs(5)), SearchPhase::Ready);
	assert_eq!(session.view(), ViewModel::NoResults);
}

#[test]
fn settle_accepts_timeouts_beyond_the_clock_range() {
	let service = |query: &str| -> Result<Vec<SearchableEntity>, LookupError> {
		Ok(vec![SearchableEntity::named(query)])
	};
	let dispatcher = QueryDispatcher::spawn(service, Duration::from_millis(10));
	let mut session = SearchSession::new(dispatcher, MemoryStore::new(), |_: Navigation| {});

	assert_eq!(session.settle(Duration::MAX), SearchPhase::Idle);

	session.on_input("lic", Instant::now());
	assert_eq!(session.settle(Duration::from_secs(u64::MAX)), SearchPhase::Ready);
	assert_eq!(session.query().results, vec![SearchableEntity::named("lic")]);
}
