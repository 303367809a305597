//! Structural lookup of the account summary page.
//!
//! The page carries no ids, so every region is addressed by position, except
//! the boxes in the right column which are found by the text of their first
//! row. The indices and captions in [`PAGE_PLAN`] mirror the live markup and
//! must change together with it.

use crate::utils::error::{Result, SummaryError};
use scraper::{ElementRef, Html};
use std::fmt;

pub const CASH_CAPTION: &str = "お預り金";
pub const BUYING_POWER_CAPTION: &str = "買付余力";
pub const FUND_CAPTION: &str = "投資信託";
pub const ORDER_INQUIRY_CAPTION: &str = "注文照会";

/// The summary table is inserted right after this region.
pub const ANCHOR_REGION: Region = Region::FundTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Frame,
    ContentRow,
    LeftColumn,
    RightColumn,
    AssetTable,
    CashTable,
    BuyingPowerTable,
    FundTable,
    OrderInquiryTable,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::Frame => "frame table",
            Region::ContentRow => "content row",
            Region::LeftColumn => "left column",
            Region::RightColumn => "right column",
            Region::AssetTable => "asset table",
            Region::CashTable => "cash table (お預り金)",
            Region::BuyingPowerTable => "buying power table (買付余力)",
            Region::FundTable => "fund table (投資信託)",
            Region::OrderInquiryTable => "order inquiry table (注文照会)",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 單一步驟的結構選擇
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First descendant element with the tag.
    Descendant(&'static str),
    /// n-th direct child element with the tag.
    Child(&'static str, usize),
    /// n-th row of a table, looking through thead/tbody/tfoot.
    Row(usize),
    /// n-th td/th of a row.
    Cell(usize),
    /// First descendant table whose first row reads exactly this text.
    Caption(&'static str),
}

impl Step {
    pub fn apply<'a>(&self, from: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match *self {
            Step::Descendant(tag) => descendant_elements(from).find(|el| el.value().name() == tag),
            Step::Child(tag, index) => child_elements(from)
                .filter(|el| el.value().name() == tag)
                .nth(index),
            Step::Row(index) => table_rows(from).into_iter().nth(index),
            Step::Cell(index) => row_cells(from).nth(index),
            Step::Caption(caption) => descendant_elements(from)
                .filter(|el| el.value().name() == "table")
                .find(|table| {
                    table_rows(*table)
                        .first()
                        .map(|row| normalized_text(*row) == caption)
                        .unwrap_or(false)
                }),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Descendant(tag) => write!(f, "first <{}>", tag),
            Step::Child(tag, index) => write!(f, "<{}> child #{}", tag, index),
            Step::Row(index) => write!(f, "row #{}", index),
            Step::Cell(index) => write!(f, "cell #{}", index),
            Step::Caption(caption) => write!(f, "table captioned '{}'", caption),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocateStep {
    pub region: Region,
    /// `None` starts at the document's root element.
    pub from: Option<Region>,
    pub steps: &'static [Step],
}

pub const PAGE_PLAN: &[LocateStep] = &[
    LocateStep {
        region: Region::Frame,
        from: None,
        steps: &[Step::Descendant("body"), Step::Child("table", 0)],
    },
    LocateStep {
        region: Region::ContentRow,
        from: Some(Region::Frame),
        steps: &[Step::Row(1)],
    },
    LocateStep {
        region: Region::LeftColumn,
        from: Some(Region::ContentRow),
        steps: &[Step::Cell(0)],
    },
    LocateStep {
        region: Region::RightColumn,
        from: Some(Region::ContentRow),
        steps: &[Step::Cell(2)],
    },
    LocateStep {
        region: Region::AssetTable,
        from: Some(Region::LeftColumn),
        steps: &[Step::Descendant("table")],
    },
    LocateStep {
        region: Region::CashTable,
        from: Some(Region::RightColumn),
        steps: &[Step::Caption(CASH_CAPTION)],
    },
    LocateStep {
        region: Region::BuyingPowerTable,
        from: Some(Region::RightColumn),
        steps: &[Step::Caption(BUYING_POWER_CAPTION)],
    },
    LocateStep {
        region: Region::FundTable,
        from: Some(Region::RightColumn),
        steps: &[Step::Caption(FUND_CAPTION)],
    },
    LocateStep {
        region: Region::OrderInquiryTable,
        from: Some(Region::RightColumn),
        steps: &[Step::Caption(ORDER_INQUIRY_CAPTION)],
    },
];

/// 頁面中已定位的區域；全部找到才會建立
#[derive(Debug, Clone, Copy)]
pub struct PageStructure<'a> {
    pub frame: ElementRef<'a>,
    pub content_row: ElementRef<'a>,
    pub left_column: ElementRef<'a>,
    pub right_column: ElementRef<'a>,
    pub asset_table: ElementRef<'a>,
    pub cash_table: ElementRef<'a>,
    pub buying_power_table: ElementRef<'a>,
    pub fund_table: ElementRef<'a>,
    pub order_inquiry_table: ElementRef<'a>,
}

impl<'a> PageStructure<'a> {
    pub fn region(&self, region: Region) -> ElementRef<'a> {
        match region {
            Region::Frame => self.frame,
            Region::ContentRow => self.content_row,
            Region::LeftColumn => self.left_column,
            Region::RightColumn => self.right_column,
            Region::AssetTable => self.asset_table,
            Region::CashTable => self.cash_table,
            Region::BuyingPowerTable => self.buying_power_table,
            Region::FundTable => self.fund_table,
            Region::OrderInquiryTable => self.order_inquiry_table,
        }
    }

    pub fn anchor(&self) -> ElementRef<'a> {
        self.region(ANCHOR_REGION)
    }
}

/// Outcome of walking a plan: what resolved before the first failure.
#[derive(Debug)]
pub struct LocateTrace<'a> {
    pub resolved: Vec<(Region, ElementRef<'a>)>,
    pub failure: Option<SummaryError>,
}

impl<'a> LocateTrace<'a> {
    pub fn get(&self, region: Region) -> Option<ElementRef<'a>> {
        lookup(&self.resolved, region)
    }
}

pub struct PageLocator;

impl PageLocator {
    pub fn locate(document: &Html) -> Result<PageStructure<'_>> {
        let LocateTrace { resolved, failure } = Self::trace(document, PAGE_PLAN);
        if let Some(err) = failure {
            return Err(err);
        }

        let take = |region: Region| {
            lookup(&resolved, region).ok_or_else(|| {
                SummaryError::element_not_found(region.name(), "region missing from plan")
            })
        };

        Ok(PageStructure {
            frame: take(Region::Frame)?,
            content_row: take(Region::ContentRow)?,
            left_column: take(Region::LeftColumn)?,
            right_column: take(Region::RightColumn)?,
            asset_table: take(Region::AssetTable)?,
            cash_table: take(Region::CashTable)?,
            buying_power_table: take(Region::BuyingPowerTable)?,
            fund_table: take(Region::FundTable)?,
            order_inquiry_table: take(Region::OrderInquiryTable)?,
        })
    }

    /// Walks `plan` in order and stops at the first region that cannot be found.
    pub fn trace<'a>(document: &'a Html, plan: &[LocateStep]) -> LocateTrace<'a> {
        let mut resolved: Vec<(Region, ElementRef<'a>)> = Vec::with_capacity(plan.len());

        for entry in plan {
            match Self::resolve(document, entry, &resolved) {
                Ok(element) => {
                    tracing::debug!("Located {} as <{}>", entry.region, element.value().name());
                    resolved.push((entry.region, element));
                }
                Err(err) => {
                    tracing::debug!("Locate stopped at {}: {}", entry.region, err);
                    return LocateTrace {
                        resolved,
                        failure: Some(err),
                    };
                }
            }
        }

        LocateTrace {
            resolved,
            failure: None,
        }
    }

    fn resolve<'a>(
        document: &'a Html,
        entry: &LocateStep,
        resolved: &[(Region, ElementRef<'a>)],
    ) -> Result<ElementRef<'a>> {
        let mut current = match entry.from {
            None => document.root_element(),
            Some(parent) => lookup(resolved, parent).ok_or_else(|| {
                SummaryError::element_not_found(
                    entry.region.name(),
                    format!("parent region '{}' not located", parent),
                )
            })?,
        };

        for step in entry.steps {
            current = step
                .apply(current)
                .ok_or_else(|| SummaryError::element_not_found(entry.region.name(), step.to_string()))?;
        }

        Ok(current)
    }
}

fn lookup<'a>(resolved: &[(Region, ElementRef<'a>)], region: Region) -> Option<ElementRef<'a>> {
    resolved
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, el)| *el)
}

pub(crate) fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    // descendants() 包含自己
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Rows of a table in document order, through any row-group sections.
pub(crate) fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|el| el.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

pub(crate) fn row_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    child_elements(row).filter(|el| matches!(el.value().name(), "td" | "th"))
}

/// Element text with runs of whitespace collapsed to one space.
pub fn normalized_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
