//! Submission orchestration: input in, optimistic turn pair committed, response handed off.

use std::cell::OnceCell;
use std::sync::Arc;

use dcommon::SessionId;
use dprovider::ResponseRequest;

use crate::history::title_prefix;
use crate::{
    ChatError, ContextToggle, EngineConfig, EngineHooks, HistoryEntry, HistoryStore,
    InMemoryHistoryStore, InMemorySessionRegistry, InputParser, ModelSelection, NoopEngineHooks,
    ParsedInput, Reconciler, ResponseDispatcher, ResponseHandoff, SessionRegistry, Turn,
    TurnTarget, resolve_context,
};

/// What `submit` did with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, a bare mode token, or a non-retriable resubmission.
    Ignored,
    /// The turn pair was committed and the response handed off.
    Submitted(TurnTarget),
    /// A store or dispatcher failure stopped the submission.
    Dropped(ChatError),
}

impl SubmitOutcome {
    pub fn target(&self) -> Option<&TurnTarget> {
        match self {
            Self::Submitted(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

#[derive(Clone)]
pub struct ChatEngine {
    registry: Arc<dyn SessionRegistry>,
    history: Arc<dyn HistoryStore>,
    dispatcher: Arc<dyn ResponseDispatcher>,
    hooks: Arc<dyn EngineHooks>,
    reconciler: Reconciler,
    context: ContextToggle,
    model: ModelSelection,
    parser: InputParser,
    config: EngineConfig,
}

impl ChatEngine {
    pub fn builder(dispatcher: Arc<dyn ResponseDispatcher>) -> ChatEngineBuilder {
        ChatEngineBuilder::new(dispatcher)
    }

    /// Commits a user turn and a pending assistant placeholder, then hands the request off.
    ///
    /// Never waits for the response and never returns an error: failures surface as
    /// [`SubmitOutcome::Dropped`] and through [`EngineHooks::on_store_error`].
    pub fn submit(&self, session_id: &SessionId, raw: &str) -> SubmitOutcome {
        let Some(input) = self.parser.parse(raw) else {
            self.hooks.on_input_ignored(session_id);
            return SubmitOutcome::Ignored;
        };

        match self.commit(session_id, input) {
            Ok(target) => SubmitOutcome::Submitted(target),
            Err(error) => {
                self.hooks.on_store_error(session_id, &error);
                SubmitOutcome::Dropped(error)
            }
        }
    }

    /// Replays the user turn at `index`. Anything but a user turn is ignored.
    pub fn resubmit(&self, session_id: &SessionId, index: usize) -> SubmitOutcome {
        let turns = match self.registry.list_for(session_id) {
            Ok(turns) => turns,
            Err(error) => {
                self.hooks.on_store_error(session_id, &error);
                return SubmitOutcome::Dropped(error);
            }
        };

        let Some(turn) = turns.get(index).filter(|turn| turn.is_retriable()) else {
            self.hooks.on_input_ignored(session_id);
            return SubmitOutcome::Ignored;
        };

        let raw = self
            .parser
            .compose(&turn.request_payload.prompt, turn.is_image_mode);
        self.submit(session_id, &raw)
    }

    /// Navigates to a session, creating it and its history entry on first visit.
    pub fn open_session(&self, session_id: &SessionId) -> Result<Vec<Turn>, ChatError> {
        self.registry.open(session_id)?;
        self.history.ensure(session_id)?;
        self.registry.list_for(session_id)
    }

    /// Empties the session's turns. In-flight responses for earlier turns become no-ops.
    pub fn clear_session(&self, session_id: &SessionId) -> Result<(), ChatError> {
        self.registry.clear(session_id)?;
        self.hooks.on_session_cleared(session_id);
        Ok(())
    }

    pub fn rename_session(&self, session_id: &SessionId, title: &str) -> Result<(), ChatError> {
        self.history.rename(session_id, title)
    }

    pub fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, ChatError> {
        self.registry.list_for(session_id)
    }

    pub fn history_entry(&self, session_id: &SessionId) -> Result<Option<HistoryEntry>, ChatError> {
        self.history.entry(session_id)
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>, ChatError> {
        self.history.entries()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn registry(&self) -> &Arc<dyn SessionRegistry> {
        &self.registry
    }

    pub fn context_toggle(&self) -> &ContextToggle {
        &self.context
    }

    pub fn model_selection(&self) -> &ModelSelection {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn commit(&self, session_id: &SessionId, input: ParsedInput) -> Result<TurnTarget, ChatError> {
        let ParsedInput {
            prompt,
            is_image_mode,
        } = input;

        self.registry.open(session_id)?;
        self.history.ensure(session_id)?;
        let title = title_prefix(&prompt, self.config.title_max_chars);
        if self.history.set_title_if_default(session_id, &title)? {
            self.hooks.on_title_set(session_id, &title);
        }

        let timestamp = self.timestamp();
        let user = Turn::user(timestamp.clone(), prompt.clone(), is_image_mode);
        let context_enabled = self.context.get();
        let model_variant = self.model.get();
        let resolved = OnceCell::new();
        let target = self.registry.append_exchange(session_id, user, &|prior| {
            let options = resolve_context(prior, context_enabled, is_image_mode, model_variant);
            let _ = resolved.set(options.clone());
            Turn::assistant_placeholder(timestamp.clone(), prompt.clone(), options)
        })?;
        let options = resolved
            .into_inner()
            .ok_or_else(|| ChatError::store("registry committed no placeholder"))?;

        let request = ResponseRequest::new(prompt, options);
        self.hooks.on_submitted(&target, &request);

        let handoff = ResponseHandoff::new(target.clone(), request);
        if let Err(error) = self.dispatcher.dispatch(handoff, self.reconciler.clone()) {
            self.reconciler.on_failed(&target, error.to_string());
            return Err(error);
        }

        Ok(target)
    }

    fn timestamp(&self) -> String {
        chrono::Local::now()
            .format(&self.config.timestamp_format)
            .to_string()
    }
}

pub struct ChatEngineBuilder {
    dispatcher: Arc<dyn ResponseDispatcher>,
    registry: Option<Arc<dyn SessionRegistry>>,
    history: Option<Arc<dyn HistoryStore>>,
    hooks: Arc<dyn EngineHooks>,
    context: ContextToggle,
    model: ModelSelection,
    config: EngineConfig,
}

impl ChatEngineBuilder {
    pub fn new(dispatcher: Arc<dyn ResponseDispatcher>) -> Self {
        Self {
            dispatcher,
            registry: None,
            history: None,
            hooks: Arc::new(NoopEngineHooks),
            context: ContextToggle::default(),
            model: ModelSelection::default(),
            config: EngineConfig::default(),
        }
    }

    pub fn registry(mut self, registry: Arc<dyn SessionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the history store. The store's own sentinel title wins over
    /// `EngineConfig::default_title`.
    pub fn history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn EngineHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn context_toggle(mut self, context: ContextToggle) -> Self {
        self.context = context;
        self
    }

    pub fn model_selection(mut self, model: ModelSelection) -> Self {
        self.model = model;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ChatEngine, ChatError> {
        self.config.validate()?;
        let parser = InputParser::new(self.config.mode_token.clone())?;

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemorySessionRegistry::new()));
        let history = self.history.unwrap_or_else(|| {
            Arc::new(InMemoryHistoryStore::new(self.config.default_title.clone()))
        });
        let reconciler = Reconciler::new(Arc::clone(&registry), Arc::clone(&self.hooks));

        Ok(ChatEngine {
            registry,
            history,
            dispatcher: self.dispatcher,
            hooks: self.hooks,
            reconciler,
            context: self.context,
            model: self.model,
            parser,
            config: self.config,
        })
    }
}
