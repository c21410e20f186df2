//! Folder enumeration.

use async_recursion::async_recursion;
use tracing::debug;

use crate::client::DriveClient;
use crate::error::Result;
use crate::models::FileDescriptor;

/// List the files under `folder_id`.
///
/// Without `recursive` the folder's direct children are returned as-is,
/// sub-folders included. With `recursive` every sub-folder is descended
/// into and only non-folder items come back, each carrying the names of the
/// folders between `folder_id` and its parent in `folder_path`.
///
/// Any listing failure aborts the whole enumeration.
#[async_recursion]
pub async fn list_files(client: &DriveClient, folder_id: &str, recursive: bool) -> Result<Vec<FileDescriptor>> {
    let items = client.list_children(folder_id).await?;
    debug!(folder_id, count = items.len(), recursive, "folder listed");

    if !recursive {
        return Ok(items.into_iter().map(FileDescriptor::from).collect());
    }

    let mut all_files = Vec::new();
    for item in items {
        if item.is_folder() {
            let mut children = list_files(client, &item.id, true).await?;
            // Paths are annotated as the recursion unwinds, so each level
            // only prepends its own name.
            for child in &mut children {
                child.prepend_folder(&item.name);
            }
            all_files.extend(children);
        } else {
            all_files.push(FileDescriptor::from(item));
        }
    }

    Ok(all_files)
}
