//! 対象日の対話式選択

use crate::error::{PlateReconError, Result};
use dialoguer::Select;
use plate_recon_common::timestamp::format_date_key;
use plate_recon_common::{DateCount, DateFilter};

/// 選択肢（表示ラベルとフィルタ）。先頭は常に All
pub fn date_choices(dates: &[DateCount]) -> Vec<(String, DateFilter)> {
    let total: usize = dates.iter().map(|d| d.events).sum();
    let mut choices = vec![(format!("All ({}件)", total), DateFilter::All)];
    choices.extend(
        dates
            .iter()
            .map(|d| (format!("{} ({}件)", format_date_key(d.date), d.events), DateFilter::On(d.date))),
    );
    choices
}

/// 対話式で対象日を選択
///
/// 観測された日付が1つ以下なら問い合わせずに All を返す。
pub fn select_date_interactive(dates: &[DateCount]) -> Result<DateFilter> {
    if dates.len() <= 1 {
        return Ok(DateFilter::All);
    }

    let choices = date_choices(dates);
    let labels: Vec<&str> = choices.iter().map(|(label, _)| label.as_str()).collect();

    let index = Select::new()
        .with_prompt("対象日を選択してください")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| PlateReconError::Interactive(e.to_string()))?;

    Ok(choices[index].1)
}
