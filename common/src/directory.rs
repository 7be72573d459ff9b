//! 部屋名簿（参照ディレクトリ）モジュール
//!
//! レコード出力XMLから「ナンバー → 部屋番号・姓」の参照表を構築する。
//! 照合1回分の処理中は読み取り専用で共有される。

use crate::error::{Error, Result};
use crate::types::{DirectoryEntry, PlateString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// XML上の要素名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryLayout {
    /// 繰り返しレコード要素
    pub record_tag: String,
    /// 部屋番号
    pub room_tag: String,
    /// 氏名（カンマ区切り、先頭が姓）
    pub name_tag: String,
    /// ナンバー
    pub plate_tag: String,
}

impl Default for DirectoryLayout {
    fn default() -> Self {
        Self {
            record_tag: "G_C6".into(),
            room_tag: "C6".into(),
            name_tag: "C9".into(),
            plate_tag: "C12".into(),
        }
    }
}

/// 構築時の統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// 見つかったレコード要素数
    pub records_seen: usize,
    /// 必須フィールド欠落・空ナンバーで捨てたレコード数
    pub records_skipped: usize,
    /// 先勝ちで完全一致の対象外になったナンバー数
    pub duplicate_plates: usize,
}

/// 参照ディレクトリ
#[derive(Debug, Clone, Default)]
pub struct ReferenceDirectory {
    /// 挿入順のエントリ（類似検索の走査順）
    entries: Vec<DirectoryEntry>,
    /// ナンバー → entries の添字（最初に現れたもの）
    index: HashMap<PlateString, usize>,
    stats: DirectoryStats,
}

impl ReferenceDirectory {
    /// 空のディレクトリ（参照データなし）
    pub fn empty() -> Self {
        Self::default()
    }

    /// エントリ列から構築
    ///
    /// 同じナンバーが複数ある場合、完全一致の対象は最初のものだけ。
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        let mut directory = Self::default();
        for entry in entries {
            directory.stats.records_seen += 1;
            if entry.plate.is_empty() {
                directory.stats.records_skipped += 1;
                continue;
            }
            directory.push(entry);
        }
        directory
    }

    /// XML文字列から読み込み
    ///
    /// ドキュメント自体が整形式でない場合のみ `Error::Structure`。
    /// 個々のレコードの欠落は読み飛ばす。
    pub fn from_xml(content: &str, layout: &DirectoryLayout) -> Result<Self> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let document = roxmltree::Document::parse_with_options(content, options)
            .map_err(|e| Error::Structure(e.to_string()))?;

        let mut directory = Self::default();

        let records = document
            .descendants()
            .filter(|node| node.is_element() && node.has_tag_name(layout.record_tag.as_str()));

        for (position, record) in records.enumerate() {
            directory.stats.records_seen += 1;

            match entry_from_record(&record, layout) {
                Some(entry) => directory.push(entry),
                None => {
                    directory.stats.records_skipped += 1;
                    tracing::debug!(record = position, "名簿レコードを読み飛ばし（フィールド欠落）");
                }
            }
        }

        tracing::info!(
            entries = directory.len(),
            skipped = directory.stats.records_skipped,
            duplicates = directory.stats.duplicate_plates,
            "名簿を読み込みました"
        );

        Ok(directory)
    }

    fn push(&mut self, entry: DirectoryEntry) {
        let position = self.entries.len();
        if self.index.contains_key(&entry.plate) {
            self.stats.duplicate_plates += 1;
        } else {
            self.index.insert(entry.plate.clone(), position);
        }
        self.entries.push(entry);
    }

    /// 完全一致検索
    pub fn get(&self, plate: &PlateString) -> Option<&DirectoryEntry> {
        self.index.get(plate).map(|&i| &self.entries[i])
    }

    /// 挿入順の全エントリ
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &DirectoryStats {
        &self.stats
    }
}

/// 1レコード要素からエントリを作る（3フィールドのいずれかが欠ければ `None`）
fn entry_from_record(record: &roxmltree::Node, layout: &DirectoryLayout) -> Option<DirectoryEntry> {
    let room = child_text(record, &layout.room_tag)?;
    let name = child_text(record, &layout.name_tag)?;
    let plate = PlateString::parse(&child_text(record, &layout.plate_tag)?)?;

    Some(DirectoryEntry {
        plate,
        room_id: room.trim().to_string(),
        occupant_name: last_name(&name),
    })
}

/// 子要素の直下テキストを連結（コメントを挟んでも1つの値）。テキストがなければ `None`
fn child_text(node: &roxmltree::Node, tag: &str) -> Option<String> {
    let child = node
        .children()
        .find(|child| child.is_element() && child.has_tag_name(tag))?;

    let mut texts = child.children().filter(|n| n.is_text()).filter_map(|n| n.text()).peekable();
    texts.peek()?;
    Some(texts.collect())
}

/// 氏名欄の最初のカンマより前を取り出す
pub fn last_name(full_name: &str) -> String {
    full_name
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
