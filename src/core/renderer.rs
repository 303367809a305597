use crate::core::amount::format_amount;
use crate::domain::model::{Amount, Order};
use crate::utils::error::{Result, SummaryError};
use ego_tree::NodeId;
use html_escape::encode_text;
use scraper::node::Node;
use scraper::{Html, Selector};
use std::fmt::Write as _;
use std::sync::LazyLock;

pub const SUMMARY_TABLE_CLASS: &str = "fund-order-summary";

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// 表格配色，沿用頁面既有的樣式
struct SummaryStyle {
    border_color: &'static str,
    header_color: &'static str,
    even_row_color: &'static str,
    odd_row_color: &'static str,
    total_row_color: &'static str,
    cell_class: &'static str,
}

const PAGE_STYLE: SummaryStyle = SummaryStyle {
    border_color: "#999999",
    header_color: "#CCCCCC",
    even_row_color: "#FFFFFF",
    odd_row_color: "#EEEEEE",
    total_row_color: "#FFFFCC",
    cell_class: "mtext",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryRenderer;

impl SummaryRenderer {
    /// Inserts the summary table as the next sibling of `anchor`.
    pub fn render(&self, orders: &[Order], document: &mut Html, anchor: NodeId) -> Result<()> {
        let has_parent = document
            .tree
            .get(anchor)
            .ok_or_else(|| SummaryError::RenderError {
                message: "anchor node is not part of the document".to_string(),
            })?
            .parent()
            .is_some();
        if !has_parent {
            return Err(SummaryError::RenderError {
                message: "anchor node has no parent".to_string(),
            });
        }

        let fragment = Html::parse_fragment(&self.markup(orders));
        let table = fragment
            .select(&TABLE)
            .next()
            .ok_or_else(|| SummaryError::RenderError {
                message: "summary markup produced no table".to_string(),
            })?;

        let inserted = match document.tree.get_mut(anchor) {
            Some(mut node) => node.insert_after(Node::Element(table.value().clone())).id(),
            None => {
                return Err(SummaryError::RenderError {
                    message: "anchor node vanished before insertion".to_string(),
                })
            }
        };

        // 將片段的子樹複製到文件中
        let mut pending = vec![(table.id(), inserted)];
        while let Some((source_id, target_id)) = pending.pop() {
            let Some(source) = fragment.tree.get(source_id) else {
                continue;
            };
            for child in source.children() {
                if let Some(mut target) = document.tree.get_mut(target_id) {
                    let copied = target.append(child.value().clone()).id();
                    pending.push((child.id(), copied));
                }
            }
        }

        tracing::debug!("Inserted summary table with {} order rows", orders.len());
        Ok(())
    }

    /// Markup of the summary table: header, one row per order, total.
    pub fn markup(&self, orders: &[Order]) -> String {
        let style = &PAGE_STYLE;
        let total: Amount = orders.iter().map(|order| &order.amount).sum();

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<table class="{}" width="100%" border="0" cellspacing="1" cellpadding="3" bgcolor="{}">"#,
            SUMMARY_TABLE_CLASS, style.border_color
        );
        let _ = write!(
            html,
            r#"<tr bgcolor="{color}"><th class="{class}">銘柄名</th><th class="{class}">状況</th><th class="{class}">金額</th></tr>"#,
            color = style.header_color,
            class = style.cell_class
        );

        for (index, order) in orders.iter().enumerate() {
            let color = if index % 2 == 0 {
                style.even_row_color
            } else {
                style.odd_row_color
            };
            let _ = write!(
                html,
                r#"<tr bgcolor="{color}"><td class="{class}">{name}</td><td class="{class}">{status}</td><td class="{class}" align="right">{amount}</td></tr>"#,
                color = color,
                class = style.cell_class,
                name = encode_text(&order.name),
                status = encode_text(&order.status),
                amount = format_amount(order.amount),
            );
        }

        let _ = write!(
            html,
            r#"<tr bgcolor="{color}"><td class="{class}"><b>合計</b></td><td class="{class}"></td><td class="{class}" align="right"><b>{amount}</b></td></tr>"#,
            color = style.total_row_color,
            class = style.cell_class,
            amount = format_amount(total),
        );
        html.push_str("</table>");
        html
    }
}
