//! Interlink — the junction entity tying a GMT to a trend and up to four
//! indicators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interlink {
  pub id:             i64,
  pub country:        String,
  pub gmt_id:         i64,
  pub trend_id:       i64,
  pub indicator_1_id: i64,
  pub indicator_2_id: Option<i64>,
  pub indicator_3_id: Option<i64>,
  pub indicator_4_id: Option<i64>,
}

/// Field set for inserting or updating an [`Interlink`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInterlink {
  pub country:        String,
  pub gmt_id:         i64,
  pub trend_id:       i64,
  pub indicator_1_id: i64,
  pub indicator_2_id: Option<i64>,
  pub indicator_3_id: Option<i64>,
  pub indicator_4_id: Option<i64>,
}
