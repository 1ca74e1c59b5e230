use super::grid::Grid;

/// A named grid. The name is fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    name: String,
    grid: Grid,
}

impl Sheet {
    pub fn new(name: &str) -> Sheet {
        Sheet::with_grid(name, Grid::new())
    }

    pub fn with_grid(name: &str, grid: Grid) -> Sheet {
        Sheet {
            name: name.to_string(),
            grid,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Case-insensitive comparison against a trimmed name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
