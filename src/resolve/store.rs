use crate::config::REDIRECTS_TABLE;
use crate::handler::Handler;
use crate::resolve::{Redirect, Resolve};
use futures::future::{BoxFuture, FutureExt};
use redb::{Database, ReadableTable, TableDefinition, TableError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task;

const REDIRECTS: TableDefinition<&str, &[u8]> = TableDefinition::new(REDIRECTS_TABLE);

/// Looks paths up in a redb file, opening it afresh for every request.
///
/// Any failure to open or read the file counts as a miss.
pub struct StoreResolver {
    file: PathBuf,
    // redb holds an exclusive lock on the file while open; queue our own opens behind it.
    // Taken on the blocking thread, so a dropped request cannot release it early.
    open: Arc<Mutex<()>>,
}

impl StoreResolver {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            open: Arc::new(Mutex::new(())),
        }
    }
}

impl Resolve for StoreResolver {
    fn resolve<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Option<String>> {
        async move {
            let open = Arc::clone(&self.open);
            let file = self.file.clone();
            let key = path.to_string();
            let looked_up = task::spawn_blocking(move || {
                let _open = open.lock().unwrap_or_else(PoisonError::into_inner);
                lookup(&file, &key)
            });
            match looked_up.await {
                Ok(Ok(Some(url))) if !url.is_empty() => Some(url),
                Ok(Ok(Some(_))) => {
                    log::debug!("{} -> [empty in store]", path);
                    None
                }
                Ok(Ok(None)) => {
                    log::debug!("{} -> [not in store]", path);
                    None
                }
                Ok(Err(e)) => {
                    log::warn!("{} -> [store error] {} : {}", path, self.file.display(), e);
                    None
                }
                Err(e) => {
                    log::error!("{} -> [store task failed] {}", path, e);
                    None
                }
            }
        }
        .boxed()
    }
}

/// Open `file` (creating it if missing), and read `key` from the redirects table in one read transaction.
///
/// A file without the table has no records. The database handle is dropped on every return path,
/// releasing the file lock.
fn lookup(file: &Path, key: &str) -> Result<Option<String>, redb::Error> {
    let db = Database::create(file)?;
    let txn = db.begin_read()?;
    let table = match txn.open_table(REDIRECTS) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let url = table
        .get(key)?
        .map(|v| String::from_utf8_lossy(v.value()).into_owned());
    Ok(url)
}

/// Redirect paths found in the store at `file`, and pass everything else to `fallback`.
pub fn store_handler<F: Handler>(
    file: impl Into<PathBuf>,
    fallback: F,
) -> Redirect<StoreResolver, F> {
    Redirect::new(StoreResolver::new(file), fallback)
}

#[cfg(test)]
pub(crate) fn populate(file: &Path, entries: &[(&str, &[u8])]) {
    let db = Database::create(file).unwrap();
    let txn = db.begin_write().unwrap();
    {
        let mut table = txn.open_table(REDIRECTS).unwrap();
        for (key, value) in entries {
            table.insert(*key, *value).unwrap();
        }
    }
    txn.commit().unwrap();
}
