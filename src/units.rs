#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowLength(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnLength(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

/// Side length in pixels of one maze cell when rasterizing.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellPixels(pub u32);

/// Target coordinate space units per maze cell, independently on each axis.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn new(x: f64, y: f64) -> Scale {
        Scale { x, y }
    }

    /// The scale that maps a `columns` by `rows` grid onto a `width` by `height` drawing area.
    pub fn fit(width: f64, height: f64, columns: u32, rows: u32) -> Scale {
        Scale::new(width / f64::from(columns), height / f64::from(rows))
    }
}

impl Default for Scale {
    fn default() -> Scale {
        Scale::new(1.0, 1.0)
    }
}
