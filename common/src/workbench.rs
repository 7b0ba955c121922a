use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{Level, debug, info, instrument};

use api::{
    Command,
    css::{GenerateCssReq, GenerateCssResp, ReverseCssReq, ReverseCssResp},
    diff::{DIFF_MODIFIED_KEY, DIFF_ORIGINAL_KEY, DiffReq, DiffResp},
    mode::{
        AddModeReq, AddModeResp, ListModesReq, ListModesResp, ModeId, ModeState, ModeTool,
        SelectModeReq, SelectModeResp, SetModeInputReq, SetModeInputResp,
    },
    text::{
        DEDUPE_INPUT_KEY, DEDUPE_OUTPUT_KEY, DedupeReq, DedupeResp, GROUP_INPUT_KEY,
        GROUP_OUTPUT_KEY, GroupReq, GroupResp, ReverseDedupeReq, ReverseDedupeResp,
        SORT_INPUT_KEY, SORT_OUTPUT_KEY, SortReq, SortResp,
    },
    tokens::{ExportTokensReq, ExportTokensResp},
};

use crate::{
    config::VKConfig,
    css::{arrange_outputs, generate_css, reverse_css},
    dedupe::{dedupe, reverse_dedupe},
    diff::{diff_pairs, diff_text},
    group::{format_groups, group_pairs},
    mapping::ValueMapper,
    parse::{format_pairs, parse_pairs},
    resolve::resolve_modes,
    sort::sort_pairs,
    storage::{StateStore, get_state, get_text, set_state, set_text},
    tokens::export_tokens,
};

// command handler
//
// the workbench implements this once per command type in api, which lets the cli (or any
// other front end) dispatch with a single generic call
#[async_trait]
pub trait Handler<C: Command>: Send + Sync {
    async fn handle(&self, req: C) -> Result<C::Resp>;
}

// the host for every tool
//
// it owns the configuration and the injected store, loads a tool's saved state before
// running it, and saves the inputs and outputs afterwards.  the transforms themselves
// never see the store
pub struct Workbench<S: StateStore> {
    config: Arc<VKConfig>,
    mapper: ValueMapper,
    store: S,
}

impl<S: StateStore> Workbench<S> {
    pub fn new(config: Arc<VKConfig>, store: S) -> Result<Self> {
        let mapper = config.mapper()?;

        Ok(Workbench {
            config,
            mapper,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run<C>(&self, req: C) -> Result<C::Resp>
    where
        C: Command,
        Self: Handler<C>,
    {
        info!("running {}", C::NAME);

        let resp = <Self as Handler<C>>::handle(self, req).await?;

        debug!("{} finished", C::NAME);
        Ok(resp)
    }

    // a fresh input replaces the stored one, otherwise the stored one is reused
    async fn input_or_stored(&self, key: &str, input: Option<String>) -> Result<String> {
        match input {
            Some(input) => {
                set_text(&self.store, key, &input).await?;
                Ok(input)
            }
            None => get_text(&self.store, key).await,
        }
    }

    async fn mode_state(&self, tool: ModeTool) -> Result<ModeState> {
        let state: ModeState = get_state(&self.store, tool.storage_key()).await?;

        Ok(state.normalize())
    }

    async fn save_mode_state(&self, tool: ModeTool, state: &ModeState) -> Result<()> {
        set_state(&self.store, tool.storage_key(), state).await
    }

    fn target_mode(state: &ModeState, mode_id: Option<ModeId>) -> Result<ModeId> {
        let mode_id = mode_id.unwrap_or_else(|| state.selected_mode_id.clone());

        if state.mode(&mode_id).is_none() {
            if state.modes.is_empty() {
                return Err(anyhow::Error::msg("no modes defined, add one first"));
            }
            return Err(anyhow::Error::msg(format!("unknown mode {mode_id:?}")));
        }

        Ok(mode_id)
    }
}

#[async_trait]
impl<S: StateStore> Handler<DedupeReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    async fn handle(&self, req: DedupeReq) -> Result<DedupeResp> {
        let input = self.input_or_stored(DEDUPE_INPUT_KEY, req.input).await?;

        let (pairs, duplicates) = dedupe(&parse_pairs(&input));
        let output = format_pairs(&pairs);

        set_text(&self.store, DEDUPE_OUTPUT_KEY, &output).await?;

        info!("deduplicated {duplicates} variables");
        Ok(DedupeResp { output, duplicates })
    }
}

#[async_trait]
impl<S: StateStore> Handler<ReverseDedupeReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    async fn handle(&self, req: ReverseDedupeReq) -> Result<ReverseDedupeResp> {
        let input = self.input_or_stored(DEDUPE_INPUT_KEY, req.input).await?;

        let (pairs, replacements) = reverse_dedupe(&parse_pairs(&input));
        let output = format_pairs(&pairs);

        set_text(&self.store, DEDUPE_OUTPUT_KEY, &output).await?;

        info!("reversed deduplication of {replacements} variables");
        Ok(ReverseDedupeResp {
            output,
            replacements,
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<SortReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self, req), fields(by = %req.by))]
    async fn handle(&self, req: SortReq) -> Result<SortResp> {
        let input = self.input_or_stored(SORT_INPUT_KEY, req.input).await?;

        let mut pairs = parse_pairs(&input);
        sort_pairs(&mut pairs, req.by);
        let output = format_pairs(&pairs);

        set_text(&self.store, SORT_OUTPUT_KEY, &output).await?;

        Ok(SortResp {
            output,
            lines: pairs.len(),
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<GroupReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    async fn handle(&self, req: GroupReq) -> Result<GroupResp> {
        let input = self.input_or_stored(GROUP_INPUT_KEY, req.input).await?;

        let groups = group_pairs(&parse_pairs(&input));
        let output = format_groups(&groups);

        set_text(&self.store, GROUP_OUTPUT_KEY, &output).await?;

        Ok(GroupResp {
            output,
            groups: groups.len(),
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<DiffReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    async fn handle(&self, req: DiffReq) -> Result<DiffResp> {
        let original = self.input_or_stored(DIFF_ORIGINAL_KEY, req.original).await?;
        let modified = self.input_or_stored(DIFF_MODIFIED_KEY, req.modified).await?;

        Ok(DiffResp {
            unified: diff_text(&original, &modified),
            changes: diff_pairs(&original, &modified),
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<AddModeReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self))]
    async fn handle(&self, req: AddModeReq) -> Result<AddModeResp> {
        let name = req.name.trim();

        if name.is_empty() {
            return Err(anyhow::Error::msg("mode name must not be empty"));
        }

        let mut state = self.mode_state(req.tool).await?;
        let mode = state.add_mode(name);
        self.save_mode_state(req.tool, &state).await?;

        info!("added mode {mode} to {}", req.tool);
        Ok(AddModeResp { mode })
    }
}

#[async_trait]
impl<S: StateStore> Handler<ListModesReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self))]
    async fn handle(&self, req: ListModesReq) -> Result<ListModesResp> {
        let state = self.mode_state(req.tool).await?;

        Ok(ListModesResp {
            modes: state.modes,
            selected_mode_id: state.selected_mode_id,
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<SelectModeReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self))]
    async fn handle(&self, req: SelectModeReq) -> Result<SelectModeResp> {
        let mut state = self.mode_state(req.tool).await?;

        let mode = state
            .mode(&req.mode_id)
            .cloned()
            .ok_or_else(|| anyhow::Error::msg(format!("unknown mode {:?}", req.mode_id)))?;

        state.selected_mode_id = mode.id.clone();
        self.save_mode_state(req.tool, &state).await?;

        Ok(SelectModeResp { mode })
    }
}

#[async_trait]
impl<S: StateStore> Handler<SetModeInputReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self, req), fields(tool = %req.tool))]
    async fn handle(&self, req: SetModeInputReq) -> Result<SetModeInputResp> {
        let mut state = self.mode_state(req.tool).await?;

        let mode_id = Self::target_mode(&state, req.mode_id)?;
        state.input.insert(mode_id.clone(), req.input);
        self.save_mode_state(req.tool, &state).await?;

        Ok(SetModeInputResp { mode_id })
    }
}

#[async_trait]
impl<S: StateStore> Handler<ExportTokensReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    async fn handle(&self, _req: ExportTokensReq) -> Result<ExportTokensResp> {
        let state = self.mode_state(ModeTool::Tokens).await?;

        let resolved = resolve_modes(&state.modes, &state.input, &self.mapper);
        let collection = export_tokens(&resolved, &self.config.tokens);

        info!(
            "exported {} variables across {} modes",
            collection.variables.len(),
            collection.modes.len()
        );
        Ok(ExportTokensResp { collection })
    }
}

#[async_trait]
impl<S: StateStore> Handler<GenerateCssReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self))]
    async fn handle(&self, req: GenerateCssReq) -> Result<GenerateCssResp> {
        let state = self.mode_state(ModeTool::Css).await?;

        let resolved = resolve_modes(&state.modes, &state.input, &self.mapper);
        let outputs = generate_css(&resolved, &self.config.css.selector);

        Ok(GenerateCssResp {
            outputs: arrange_outputs(outputs, req.output.unwrap_or(self.config.css.output)),
        })
    }
}

#[async_trait]
impl<S: StateStore> Handler<ReverseCssReq> for Workbench<S> {
    #[instrument(level=Level::DEBUG, skip(self, req))]
    async fn handle(&self, req: ReverseCssReq) -> Result<ReverseCssResp> {
        let mut state = self.mode_state(ModeTool::Css).await?;

        let mode_id = Self::target_mode(&state, req.mode_id)?;
        let input = reverse_css(&req.css, &self.mapper, req.inline_aliases);

        state.input.insert(mode_id.clone(), input.clone());
        self.save_mode_state(ModeTool::Css, &state).await?;

        Ok(ReverseCssResp { mode_id, input })
    }
}
