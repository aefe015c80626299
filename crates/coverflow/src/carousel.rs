use crate::geometry::{Point, Size};
use crate::layout::{Layout, LayoutParams};
use crate::scheduler::{Progress, RunId, TimerHandle, TransitionScheduler};
use crate::settings::{Element, Settings, SettingsError};
use crate::tile::{Tile, TileId};
use strum::Display;

/// Draws one tile from its current geometry. Tiles are handed over back to
/// front.
pub trait TileRenderer {
    type Error;

    fn draw_tile(&mut self, tile: &Tile) -> Result<(), Self::Error>;
}

/// Chosen once when the carousel is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Animated,
    /// Tiles jump straight to their slots and are drawn without reflections.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Ignored,
    /// `run` is set when a transition was started and needs a timer.
    Moved { index: usize, run: Option<RunId> },
}

impl Navigation {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Moved { index, .. } => Some(*index),
            Self::Ignored => None,
        }
    }

    pub fn run(&self) -> Option<RunId> {
        match self {
            Self::Moved { run, .. } => *run,
            Self::Ignored => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Miss,
    /// The selected tile was clicked; open its link.
    Activate(TileId),
    Navigate(Navigation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Stale,
    Running { redraw: bool },
    Finished { redraw: bool },
}

#[derive(Debug)]
pub struct Carousel<H> {
    settings: Settings,
    elements: Vec<Element>,
    tiles: Vec<Tile>,
    layout: Layout,
    selected: usize,
    mode: RenderMode,
    scheduler: TransitionScheduler<H>,
    loaded: Vec<bool>,
    images_ready: bool,
}

impl<H: TimerHandle> Carousel<H> {
    pub fn new(
        settings: Settings,
        elements: Vec<Element>,
        container: Size,
        mode: RenderMode,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;

        let count = elements.len();
        let selected = settings.initial_selection(count);
        let layout = Layout::compute(count, &LayoutParams::from(&settings), container.even());
        let tiles = (0..count)
            .map(|i| {
                let geometry = layout.placement(i, selected).unwrap_or_default();
                Tile::new(TileId::from(i), geometry)
            })
            .collect();

        log::debug!("carousel with {count} tiles, {mode} mode, selected {selected}");

        Ok(Self {
            scheduler: TransitionScheduler::new(settings.animation),
            settings,
            elements,
            tiles,
            layout,
            selected,
            mode,
            loaded: vec![false; count],
            images_ready: count == 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: TileId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.selected)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn images_ready(&self) -> bool {
        self.images_ready
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn go_to_index(&mut self, index: usize) -> Navigation {
        if index >= self.tiles.len() || index == self.selected {
            return Navigation::Ignored;
        }
        self.selected = index;

        let steps = self.scheduler.steps();
        for tile in &mut self.tiles {
            if let Some(target) = self.layout.placement(tile.id().index(), index) {
                tile.set_target(target, Some(steps));
            }
        }

        let run = match self.mode {
            RenderMode::Animated => Some(self.scheduler.start()),
            RenderMode::Static => {
                self.tiles.iter_mut().for_each(Tile::snap);
                None
            }
        };
        log::debug!("selected tile {index}");

        Navigation::Moved { index, run }
    }

    pub fn go_to_previous(&mut self) -> Navigation {
        match self.selected.checked_sub(1) {
            Some(index) => self.go_to_index(index),
            None => Navigation::Ignored,
        }
    }

    pub fn go_to_next(&mut self) -> Navigation {
        self.go_to_index(self.selected + 1)
    }

    pub fn go_to_first(&mut self) -> Navigation {
        self.go_to_index(0)
    }

    pub fn go_to_last(&mut self) -> Navigation {
        match self.tiles.len().checked_sub(1) {
            Some(index) => self.go_to_index(index),
            None => Navigation::Ignored,
        }
    }

    /// Back to front. Equal depths keep list order.
    pub fn paint_order(&self) -> Vec<&Tile> {
        let mut order: Vec<&Tile> = self.tiles.iter().collect();
        order.sort_by(|a, b| a.geometry().z.total_cmp(&b.geometry().z));
        order
    }

    /// Topmost tile under `point`, looked up in reverse paint order.
    pub fn hit_test(&self, point: Point) -> Option<TileId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|tile| tile.contains(point))
            .map(Tile::id)
    }

    pub fn click(&mut self, point: Point) -> Click {
        match self.hit_test(point) {
            None => Click::Miss,
            Some(id) if id.index() == self.selected => Click::Activate(id),
            Some(id) => Click::Navigate(self.go_to_index(id.index())),
        }
    }

    pub fn attach_timer(&mut self, run: RunId, timer: H) {
        self.scheduler.attach(run, timer);
    }

    /// Drops the transition in flight, if any, and releases its timer. Tiles
    /// stay where they are.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
    }

    /// Advances every tile by one step of `run`.
    pub fn tick(&mut self, run: RunId) -> TickOutcome {
        let Some(progress) = self.scheduler.tick(run) else {
            return TickOutcome::Stale;
        };

        self.tiles.iter_mut().for_each(Tile::advance);
        let redraw = self.images_ready;

        match progress {
            Progress::Running => TickOutcome::Running { redraw },
            Progress::Finished => {
                if self.settings.animation.snap_on_finish {
                    self.tiles.iter_mut().for_each(Tile::snap);
                }
                TickOutcome::Finished { redraw }
            }
        }
    }

    /// Records that the image for `id` finished loading, successfully or not.
    /// Returns `true` exactly once: when the last outstanding image arrives.
    pub fn mark_loaded(&mut self, id: TileId) -> bool {
        let Some(loaded) = self.loaded.get_mut(id.index()) else {
            return false;
        };
        if std::mem::replace(loaded, true) || self.images_ready {
            return false;
        }

        self.images_ready = self.loaded.iter().all(|&l| l);
        if self.images_ready {
            log::debug!("all {} tile images loaded", self.loaded.len());
        }
        self.images_ready
    }

    /// Recomputes the layout for a new container size. Tiles jump to their
    /// new slots; an animation in flight is dropped. Returns whether anything
    /// changed.
    pub fn resize(&mut self, container: Size) -> bool {
        let container = container.even();
        if container == self.layout.container() {
            return false;
        }

        self.scheduler.cancel();
        self.layout = Layout::compute(
            self.tiles.len(),
            &LayoutParams::from(&self.settings),
            container,
        );
        for tile in &mut self.tiles {
            if let Some(geometry) = self.layout.placement(tile.id().index(), self.selected) {
                tile.reset(geometry);
            }
        }
        log::debug!(
            "relayout for {}x{}",
            container.width,
            container.height
        );
        true
    }

    fn should_render(&self) -> bool {
        self.images_ready || self.mode == RenderMode::Static
    }

    pub fn render<R: TileRenderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        if !self.should_render() {
            return Ok(());
        }
        for tile in self.paint_order() {
            renderer.draw_tile(tile)?;
        }
        Ok(())
    }
}
