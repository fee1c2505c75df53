//! Column sets for the admin lists

use archive_lib::model::Document;
use archive_lib::model::User;
use archive_table::CellValue;
use archive_table::Column;
use archive_table::RowIdentity;
use archive_table::identity;

/// Documents are identified by their server id.
pub fn document_identity() -> RowIdentity<Document> {
    identity(|document: &Document| document.id.clone())
}

/// Users are identified by their server id.
pub fn user_identity() -> RowIdentity<User> {
    identity(|user: &User| user.id.clone())
}

/// Title, author, collection, access, status and submission date.
pub fn document_columns() -> Vec<Column<Document>> {
    vec![
        Column::new("title", "Title", |d: &Document| d.title.as_str().into())
            .sortable()
            .always_visible(),
        Column::new("author", "Author", |d: &Document| d.author.as_str().into()).sortable(),
        Column::new("collection", "Collection", |d: &Document| {
            d.collection_name
                .clone()
                .or_else(|| d.collection_id.as_ref().map(|id| id.to_string()))
                .into()
        })
        .sortable(),
        Column::new("access", "Access", |d: &Document| d.access.label().into()).sortable(),
        Column::new("status", "Status", |d: &Document| d.status.label().into()).sortable(),
        Column::new("submitted", "Submitted", |d: &Document| {
            d.submitted_at.map(|at| at.date_naive()).into()
        })
        .sortable()
        .unfilterable(),
    ]
}

/// Name, email, role and creation date.
pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("name", "Name", |u: &User| u.name.as_str().into())
            .sortable()
            .always_visible(),
        Column::new("email", "Email", |u: &User| u.email.as_str().into()).sortable(),
        Column::new("role", "Role", |u: &User| CellValue::text(u.role.label())).sortable(),
        Column::new("created", "Created", |u: &User| {
            u.created_at.map(|at| at.date_naive()).into()
        })
        .sortable()
        .unfilterable(),
    ]
}
