//! Table view columns.
//!
//! A [`TableViewColumn`] keeps its presentation settings locally and pushes
//! them to the native list view it is attached to. The list view is reached
//! through the [`ColumnHost`] trait and referenced weakly.

use std::{
    cell::RefCell,
    mem,
    rc::{Rc, Weak},
};

use tracing::debug;

use crate::error::{Error, Result};

/// Default column width.
const DEFAULT_WIDTH: i32 = 50;
/// Width used when a column with no width is inserted.
const FALLBACK_WIDTH: i32 = 100;

/// Horizontal alignment of column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left edge.
    #[default]
    Near,
    /// Centered.
    Center,
    /// Right edge.
    Far,
}

impl Alignment {
    /// Native column format value.
    pub fn native_format(self) -> i32 {
        match self {
            Self::Near => 0,
            Self::Far => 1,
            Self::Center => 2,
        }
    }
}

/// Column settings as handed to the native list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDesc {
    /// Column index.
    pub index: i32,
    /// Header text.
    pub title: String,
    /// Width in pixels.
    pub width: i32,
    /// Native format value.
    pub format: i32,
}

/// The native list view columns are attached to. Every operation returns
/// `false` on failure.
pub trait ColumnHost {
    /// Insert a column.
    fn insert_column(&mut self, desc: &ColumnDesc) -> bool;
    /// Delete the column at `index`.
    fn delete_column(&mut self, index: i32) -> bool;
    /// Update the column at `desc.index`.
    fn set_column(&mut self, desc: &ColumnDesc) -> bool;
    /// Live width of the column at `index`.
    fn column_width(&self, index: i32) -> i32;
    /// Redraw every cell.
    fn invalidate(&mut self) -> bool;
}

/// One column of a table view.
#[derive(Debug, Clone)]
pub struct TableViewColumn {
    /// Attached list view.
    host: Option<Weak<RefCell<dyn ColumnHost>>>,
    /// Column index; -1 while unattached.
    index: i32,
    /// Content alignment.
    alignment: Alignment,
    /// Value format string.
    format: String,
    /// Decimal places for floating point values.
    precision: i32,
    /// Header text.
    title: String,
    /// Whether the column is shown.
    visible: bool,
    /// Cached width.
    width: i32,
}

impl Default for TableViewColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl TableViewColumn {
    /// A detached, visible column with default settings.
    pub fn new() -> Self {
        Self {
            host: None,
            index: -1,
            alignment: Alignment::Near,
            format: "%v".to_string(),
            precision: 0,
            title: String::new(),
            visible: true,
            width: DEFAULT_WIDTH,
        }
    }

    /// Column index, or -1 while unattached.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Associate the column with a list view at `index`. Nothing is sent to
    /// the host until [`create`](Self::create).
    pub fn attach(&mut self, host: &Rc<RefCell<dyn ColumnHost>>, index: i32) {
        self.host = Some(Rc::downgrade(host));
        self.index = index;
    }

    /// Forget the list view.
    pub fn detach(&mut self) {
        self.host = None;
        self.index = -1;
    }

    /// The attached host, if it is still alive.
    fn host(&self) -> Option<Rc<RefCell<dyn ColumnHost>>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }

    /// Settings as handed to the host.
    fn desc(&self, width: i32) -> ColumnDesc {
        ColumnDesc {
            index: self.index,
            title: self.title.clone(),
            width,
            format: self.alignment.native_format(),
        }
    }

    /// Replace a field and push the change, restoring the old value if the
    /// push fails.
    fn replace<T>(
        &mut self,
        slot: fn(&mut Self) -> &mut T,
        value: T,
        push: fn(&Self) -> Result<()>,
    ) -> Result<()> {
        let old = mem::replace(slot(self), value);
        if let Err(e) = push(self) {
            *slot(self) = old;
            return Err(e);
        }
        Ok(())
    }

    /// Send the current settings to the host. Nothing is sent while
    /// detached or invisible.
    fn update(&self) -> Result<()> {
        let Some(host) = self.host() else {
            return Ok(());
        };
        if !self.visible {
            return Ok(());
        }
        let desc = self.desc(self.width());
        if !host.borrow_mut().set_column(&desc) {
            return Err(Error::Native("LVM_SETCOLUMN".into()));
        }
        Ok(())
    }

    /// Redraw the host's cells.
    fn invalidate(&self) -> Result<()> {
        let Some(host) = self.host() else {
            return Ok(());
        };
        if !host.borrow_mut().invalidate() {
            return Err(Error::Native("InvalidateRect".into()));
        }
        Ok(())
    }

    /// Horizontal alignment of cell text.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Set the alignment, pushing it to an attached host.
    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<()> {
        if alignment == self.alignment {
            return Ok(());
        }
        self.replace(|c| &mut c.alignment, alignment, Self::update)
    }

    /// Format string for converting values to text.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Set the format string and repaint an attached host.
    pub fn set_format(&mut self, format: &str) -> Result<()> {
        if format == self.format {
            return Ok(());
        }
        self.replace(|c| &mut c.format, format.to_string(), Self::invalidate)
    }

    /// Decimal places for floating point values.
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Set the precision and repaint an attached host.
    pub fn set_precision(&mut self, precision: i32) -> Result<()> {
        if precision == self.precision {
            return Ok(());
        }
        self.replace(|c| &mut c.precision, precision, Self::invalidate)
    }

    /// Header text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the header text, pushing it to an attached host.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        if title == self.title {
            return Ok(());
        }
        self.replace(|c| &mut c.title, title.to_string(), Self::update)
    }

    /// Whether the column is shown.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the column, inserting it into or deleting it from an
    /// attached host.
    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        if visible == self.visible {
            return Ok(());
        }
        let push: fn(&Self) -> Result<()> = if visible {
            Self::create
        } else {
            Self::destroy
        };
        self.replace(|c| &mut c.visible, visible, push)
    }

    /// Width in pixels. A detached or invisible column reports its cached
    /// width; otherwise the host is asked for the live width.
    pub fn width(&self) -> i32 {
        match self.host() {
            Some(host) if self.visible => host.borrow().column_width(self.index),
            _ => self.width,
        }
    }

    /// Set the width in pixels. A failed host update restores the old width.
    pub fn set_width(&mut self, width: i32) -> Result<()> {
        if width == self.width() {
            return Ok(());
        }
        let old = mem::replace(&mut self.width, width);
        // The live width is about to be replaced, so push the new one.
        let result = match self.host() {
            Some(host) if self.visible => {
                if host.borrow_mut().set_column(&self.desc(width)) {
                    Ok(())
                } else {
                    Err(Error::Native("LVM_SETCOLUMN".into()))
                }
            }
            _ => Ok(()),
        };
        if result.is_err() {
            self.width = old;
        }
        result
    }

    /// Insert the column into the attached host.
    pub fn create(&self) -> Result<()> {
        let Some(host) = self.host() else {
            return Ok(());
        };
        let width = if self.width > 0 {
            self.width
        } else {
            FALLBACK_WIDTH
        };
        if !host.borrow_mut().insert_column(&self.desc(width)) {
            return Err(Error::Native(
                "LVM_INSERTCOLUMN: failed to insert column".into(),
            ));
        }
        debug!("inserted column {} ({:?})", self.index, self.title);
        Ok(())
    }

    /// Delete the column from the attached host.
    pub fn destroy(&self) -> Result<()> {
        let Some(host) = self.host() else {
            return Ok(());
        };
        if !host.borrow_mut().delete_column(self.index) {
            return Err(Error::Native("LVM_DELETECOLUMN".into()));
        }
        debug!("deleted column {}", self.index);
        Ok(())
    }
}
