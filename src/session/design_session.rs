use std::sync::Arc;

use crate::animation::transition::{TransitionDriver, TransitionState};
use crate::codec::decode::decode;
use crate::customize::apply::apply_view;
use crate::customize::context::CustomizationContext;
use crate::document::model::Document;
use crate::document::query::NodeQuery;
use crate::foundation::error::DesignResult;
use crate::layout::cache::FrameCaches;
use crate::layout::bridge::layout_tree;
use crate::layout::taffy_bridge::TaffyLayoutEngine;
use crate::layout::{LayoutEngine, TextMeasure};
use crate::resolve::resolver::Resolver;
use crate::session::opts::SessionOpts;
use crate::tree::arena::RenderTree;

/// Per-frame bookkeeping reported by [`DesignSession::end_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Layout nodes dropped because no tree registered them this frame.
    pub pruned_layout_nodes: usize,
    /// Text measurements served from the cache.
    pub text_hits: u64,
    /// Text measurements that called the host.
    pub text_misses: u64,
}

/// Render-thread state for one document.
///
/// A session owns the current document, the layout engine, the frame caches and the transition
/// driver. Everything runs synchronously on the caller's thread; a new document is published by
/// whole replacement through [`DesignSession::replace_document`].
pub struct DesignSession<E: LayoutEngine = TaffyLayoutEngine> {
    document: Arc<Document>,
    opts: SessionOpts,
    engine: E,
    caches: FrameCaches,
    driver: TransitionDriver,
}

impl DesignSession<TaffyLayoutEngine> {
    /// Session over `document` using the bundled taffy engine.
    pub fn new(document: Arc<Document>, opts: SessionOpts) -> DesignResult<Self> {
        Self::with_engine(document, opts, TaffyLayoutEngine::new())
    }

    /// Decode `bytes` and open a session over the result.
    pub fn from_bytes(bytes: &[u8], opts: SessionOpts) -> DesignResult<Self> {
        Self::new(Arc::new(decode(bytes)?), opts)
    }
}

impl<E: LayoutEngine> DesignSession<E> {
    /// Session driving a caller-supplied layout engine.
    pub fn with_engine(document: Arc<Document>, opts: SessionOpts, engine: E) -> DesignResult<Self> {
        opts.validate()?;
        Ok(Self {
            document,
            caches: FrameCaches::with_text_cache(opts.text_cache_enabled),
            driver: TransitionDriver::new(opts.transition),
            opts,
            engine,
        })
    }

    /// The document every render resolves against.
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Options the session was created with.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// The layout engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The layout engine, for host-side inspection or resets.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Transition state between presented trees.
    pub fn driver(&self) -> &TransitionDriver {
        &self.driver
    }

    /// Publish a newer document. Trees rendered from the old one stay valid; layout nodes they
    /// registered are pruned by the next [`end_frame`](Self::end_frame) that does not touch them.
    pub fn replace_document(&mut self, document: Arc<Document>) {
        tracing::debug!(
            old = %self.document.header().id,
            new = %document.header().id,
            views = document.len(),
            "document replaced"
        );
        self.document = document;
    }

    /// Resolve `query`, apply `ctx`, and lay the result out in the viewport.
    #[tracing::instrument(skip(self, query, ctx, measure), fields(query = %query))]
    pub fn render(
        &mut self,
        query: &NodeQuery,
        ctx: &CustomizationContext,
        measure: &mut dyn TextMeasure,
    ) -> DesignResult<RenderTree> {
        let resolver = Resolver::new(&self.document);
        let view = resolver.resolve(query, ctx)?;
        let mut tree = apply_view(view, ctx, &resolver);
        layout_tree(
            &mut self.engine,
            &mut tree,
            self.opts.viewport,
            &mut self.caches,
            measure,
        )?;
        Ok(tree)
    }

    /// Show `tree` immediately, dropping any running transition.
    pub fn present(&mut self, tree: RenderTree) {
        self.driver.present(tree);
    }

    /// Animate from the tree on screen to `tree`.
    pub fn transition_to(&mut self, tree: RenderTree) -> TransitionState {
        self.driver.set_spec(self.opts.transition);
        self.driver.request(tree)
    }

    /// Advance a running transition; a finished one is promoted on the same call.
    pub fn tick(&mut self, dt: f64) -> TransitionState {
        if self.driver.tick(dt) == TransitionState::Finished {
            self.driver.finish();
        }
        self.driver.state()
    }

    /// Abandon the running transition.
    pub fn cancel_transition(&mut self) {
        self.driver.cancel();
    }

    /// Tree to paint this frame.
    pub fn current_tree(&self) -> Option<&RenderTree> {
        self.driver.tree()
    }

    /// Collect the frame caches and prune layout nodes not registered since the last call.
    ///
    /// Call once per frame, after every tree of the frame was rendered.
    pub fn end_frame(&mut self) -> FrameStats {
        let text = self.caches.text.stats();
        self.caches.collect();
        let pruned = self.engine.end_frame();
        FrameStats {
            pruned_layout_nodes: pruned,
            text_hits: text.hits,
            text_misses: text.misses,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/design_session.rs"]
mod tests;
