use crate::aggregate::{accumulate, normalize};
use crate::config::TreemapConfig;
use crate::error::{ConfigError, RenderError, TreemapError};
use crate::frame::{Frame, TileKind, Transition};
use crate::hierarchy::build;
use crate::label::{FixedAdvance, LabelCuller, TextMeasure};
use crate::layout::LayoutEngine;
use crate::model::{NodeId, Record, Tree};
use crate::zoom::{ZoomController, ZoomState};

/// Paints frames and animates transitions between them.
pub trait Renderer {
    fn paint(&mut self, frame: &Frame) -> Result<(), RenderError>;

    /// Start animating a level change. Keep `transition.handle` and finish
    /// it once the animation has ended.
    fn transition(&mut self, transition: Transition) -> Result<(), RenderError>;

    /// The transition to `frame` is over; drop whatever is left of the
    /// previous level.
    fn settle(&mut self, _frame: &Frame) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Selects a row of the external table for a drilled-down leaf.
pub trait RowActivator {
    fn activate(&mut self, index: usize) -> Result<(), RenderError>;
}

impl<F> RowActivator for F
where
    F: FnMut(usize) -> Result<(), RenderError>,
{
    fn activate(&mut self, index: usize) -> Result<(), RenderError> {
        self(index)
    }
}

/// External pieces the widget drives.
pub struct Collaborators<R> {
    pub renderer: R,
    pub rows: Option<Box<dyn RowActivator>>,
    pub measure: Box<dyn TextMeasure>,
}

impl<R: Renderer> Collaborators<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            rows: None,
            measure: Box::new(FixedAdvance::default()),
        }
    }

    pub fn with_rows(mut self, rows: impl RowActivator + 'static) -> Self {
        self.rows = Some(Box::new(rows));
        self
    }

    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The tile body.
    Rect,
    /// The tile's label text.
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Zoomed,
    Activated(usize),
    Ignored,
}

/// A zoomable, drill-down treemap over a flat record list.
pub struct Treemap<R: Renderer> {
    tree: Tree,
    config: TreemapConfig,
    engine: LayoutEngine,
    culler: LabelCuller,
    zoom: ZoomController,
    frame: Frame,
    renderer: R,
    rows: Option<Box<dyn RowActivator>>,
}

impl<R: Renderer> Treemap<R> {
    /// Build the tree and paint the root level.
    ///
    /// Configuration is checked before anything else. Input without any root
    /// yields `Ok(None)` and nothing is painted.
    pub fn new(
        records: impl IntoIterator<Item = Record>,
        config: TreemapConfig,
        parts: Collaborators<R>,
    ) -> Result<Option<Self>, TreemapError> {
        config.validate()?;
        if config.drilldown && parts.rows.is_none() {
            return Err(ConfigError::MissingRowActivator.into());
        }

        let Some(mut tree) = normalize(&build(records)) else {
            tracing::debug!("no root records, nothing to display");
            return Ok(None);
        };
        let total = accumulate(&mut tree);
        tracing::debug!(nodes = tree.len(), total, "hierarchy ready");

        let engine = LayoutEngine::new(config.width, config.content_height());
        let culler = LabelCuller::new(config.label_rule, parts.measure);
        let zoom = ZoomController::new(tree.root);
        let frame = Frame::build(&tree, &engine, tree.root, &config.color, &culler);

        let mut renderer = parts.renderer;
        renderer.paint(&frame).map_err(TreemapError::Render)?;

        Ok(Some(Self {
            tree,
            config,
            engine,
            culler,
            zoom,
            frame,
            renderer,
            rows: parts.rows,
        }))
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &TreemapConfig {
        &self.config
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn current(&self) -> NodeId {
        self.zoom.current()
    }

    pub fn state(&self) -> ZoomState {
        self.zoom.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Zoom to `target`. Returns false when the request was dropped: no or
    /// unknown target, a leaf target, or a transition already in flight.
    pub fn zoom_to(&mut self, target: Option<NodeId>) -> Result<bool, TreemapError> {
        let target = target.filter(|id| match self.tree.get(*id) {
            Some(n) if !n.is_leaf() => true,
            Some(_) => {
                tracing::trace!(node = id.0, "leaf cannot be zoomed into");
                false
            }
            None => {
                tracing::trace!(node = id.0, "unknown zoom target");
                false
            }
        });
        let Some(handle) = self.zoom.request(target) else {
            return Ok(false);
        };

        let to = self.zoom.current();
        let entering = Frame::build(&self.tree, &self.engine, to, &self.config.color, &self.culler);
        let transition = Transition {
            exiting: self.frame.reproject(&entering.viewport),
            from: self.frame.viewport,
            to: entering.viewport,
            entering: entering.clone(),
            handle,
        };
        if let Err(e) = self.renderer.transition(transition) {
            self.zoom.abort();
            return Err(TreemapError::Render(e));
        }
        self.frame = entering;
        Ok(true)
    }

    /// Breadcrumb click: zoom to the parent of the displayed node. No effect
    /// at the root.
    pub fn zoom_out(&mut self) -> Result<bool, TreemapError> {
        let parent = self.zoom.parent_target(&self.tree);
        self.zoom_to(parent)
    }

    /// Handle a click on a displayed tile.
    ///
    /// Groups zoom in. Terminal tiles drill down when enabled: label clicks
    /// always do, body clicks only while the label is hidden.
    pub fn click(&mut self, id: NodeId, target: ClickTarget) -> Result<ClickOutcome, TreemapError> {
        let Some(tile) = self.frame.tile(id) else {
            return Ok(ClickOutcome::Ignored);
        };
        match tile.kind {
            TileKind::Group => Ok(if self.zoom_to(Some(id))? {
                ClickOutcome::Zoomed
            } else {
                ClickOutcome::Ignored
            }),
            TileKind::Terminal => {
                if !self.config.drilldown {
                    return Ok(ClickOutcome::Ignored);
                }
                if target == ClickTarget::Rect && tile.label.visible {
                    return Ok(ClickOutcome::Ignored);
                }
                let Some(index) = tile.row else {
                    tracing::warn!(node = id.0, name = %tile.name, "leaf has no row index");
                    return Ok(ClickOutcome::Ignored);
                };
                let Some(rows) = self.rows.as_mut() else {
                    return Ok(ClickOutcome::Ignored);
                };
                rows.activate(index)
                    .map_err(|source| TreemapError::Activation { index, source })?;
                tracing::debug!(index, "row activated");
                Ok(ClickOutcome::Activated(index))
            }
        }
    }

    /// Pick up transition completions. Returns true when the widget went
    /// back to idle.
    pub fn poll(&mut self) -> Result<bool, TreemapError> {
        if !self.zoom.poll() {
            return Ok(false);
        }
        self.renderer.settle(&self.frame).map_err(TreemapError::Render)?;
        Ok(true)
    }
}
