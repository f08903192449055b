//! Multi-page account report loop for `ZoomClient`.

use chrono::NaiveDate;

use crate::error::ZoomError;
use crate::types::AccountRow;

use super::{ZoomClient, ACCOUNT_PAGE_SIZE};

impl ZoomClient {
    /// Fetches every page of the account report between `from` and `to`.
    ///
    /// Pages are requested from 1 upward while the previous page came back
    /// with exactly [`ACCOUNT_PAGE_SIZE`] users; the first shorter (or empty)
    /// page ends the loop. Rows from earlier pages are discarded on any error.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::account_report_page`].
    /// Returns [`ZoomError::PaginationLimit`] if more than `max_pages` pages
    /// would be needed.
    pub async fn fetch_account_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        max_pages: u32,
    ) -> Result<Vec<AccountRow>, ZoomError> {
        let mut all_users: Vec<AccountRow> = Vec::new();
        let mut page_number = 0u32;

        loop {
            page_number += 1;
            if page_number > max_pages {
                return Err(ZoomError::PaginationLimit { max_pages });
            }

            let users = self.account_report_page(from, to, page_number).await?;
            let returned = users.len();
            all_users.extend(users);

            if returned != ACCOUNT_PAGE_SIZE {
                break;
            }
        }

        tracing::info!(users = all_users.len(), pages = page_number, "fetched Zoom account report");
        Ok(all_users)
    }
}
