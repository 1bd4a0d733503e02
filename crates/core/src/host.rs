//! Host interface.
//!
//! Actions never reach for global state; the host hands them a context that
//! exposes the project, the active layer and the map canvas.

use crate::extent::Extent;
use crate::layer::Layer;
use crate::project::Project;

/// What an action may ask of its host application
pub trait HostInterface {
    fn project(&self) -> &Project;

    fn project_mut(&mut self) -> &mut Project;

    /// Redraw the map canvas
    fn refresh_canvas(&mut self);

    /// Move the map canvas to show `extent`
    fn set_canvas_extent(&mut self, extent: Extent);

    fn active_layer(&self) -> Option<&Layer> {
        self.project().active_layer()
    }

    fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        self.project_mut().active_layer_mut()
    }
}

/// In-process host: a project plus a canvas that only records what it was told
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    project: Project,
    canvas_extent: Option<Extent>,
    refresh_count: usize,
}

impl MemoryHost {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            canvas_extent: None,
            refresh_count: 0,
        }
    }

    pub fn canvas_extent(&self) -> Option<Extent> {
        self.canvas_extent
    }

    /// How many times the canvas was refreshed
    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }

    pub fn into_project(self) -> Project {
        self.project
    }
}

impl HostInterface for MemoryHost {
    fn project(&self) -> &Project {
        &self.project
    }

    fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    fn refresh_canvas(&mut self) {
        self.refresh_count += 1;
    }

    fn set_canvas_extent(&mut self, extent: Extent) {
        self.canvas_extent = Some(extent);
    }
}
