//! Record source for realm provisioning.
//!
//! Reads the sheets of a spreadsheet document into [`Table`]s and offers the
//! handful of relational operations needed to turn them into desired-state
//! rows: forward-filling merged cells, projection, joins, renames and
//! grouping with list aggregation.
//!
//! ```rust,ignore
//! use realmsync_sheet::RecordSource;
//!
//! let mut source = RecordSource::load("realm.xlsx", "Roles")?;
//! let roles = source.project(&["Role", "Role description"])?;
//!
//! source.switch_sheet("Groups")?;
//! let groups = source
//!     .project(&["Name", "Description", "Role"])?
//!     .group_by("Name", "Role")?;
//! ```

pub mod cell;
pub mod error;
pub mod source;
pub mod table;

pub use cell::CellValue;
pub use error::{SheetError, SheetResult};
pub use source::RecordSource;
pub use table::{Row, Table};
