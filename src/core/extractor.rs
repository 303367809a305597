use crate::core::amount::parse_amount;
use crate::core::locator::{child_elements, normalized_text, row_cells};
use crate::domain::model::Order;
use crate::utils::error::{Result, SummaryError};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const ORDER_TABLE_CLASS: &str = "fund-order-list";

static ORDER_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&format!("table.{}", ORDER_TABLE_CLASS)).unwrap());

const STATUS_CELL: usize = 1;
const NAME_CELL: usize = 2;
const AMOUNT_CELL: usize = 2;

/// 從委託一覽頁取出投資信託的待處理委託
pub struct OrderExtractor;

impl OrderExtractor {
    /// Rows come in (header, data) pairs. Pairs without a parsable amount are
    /// skipped; a trailing header row without its data row ends extraction.
    pub fn extract(document: &Html) -> Result<Vec<Order>> {
        let table = document.select(&ORDER_TABLE).next().ok_or_else(|| {
            SummaryError::element_not_found(
                "order table",
                format!("table.{}", ORDER_TABLE_CLASS),
            )
        })?;

        let rows = body_rows(table);
        if rows.len() % 2 != 0 {
            tracing::warn!(
                "Order table has {} body rows; ignoring the trailing header row",
                rows.len()
            );
        }

        let mut orders = Vec::with_capacity(rows.len() / 2);
        for (pair_index, pair) in rows.chunks_exact(2).enumerate() {
            match Self::extract_pair(pair[0], pair[1]) {
                Some(order) => {
                    tracing::debug!("Order #{}: {} [{}] {}", pair_index, order.name, order.status, order.amount);
                    orders.push(order);
                }
                None => tracing::debug!("Row pair #{} is not an order, skipped", pair_index),
            }
        }

        tracing::info!("Extracted {} pending fund orders", orders.len());
        Ok(orders)
    }

    fn extract_pair(header: ElementRef<'_>, data: ElementRef<'_>) -> Option<Order> {
        let header_cells: Vec<_> = row_cells(header).collect();
        let amount_cell = row_cells(data).nth(AMOUNT_CELL)?;
        let amount = parse_amount(&normalized_text(amount_cell))?;

        Some(Order {
            status: normalized_text(*header_cells.get(STATUS_CELL)?),
            name: normalized_text(*header_cells.get(NAME_CELL)?),
            amount,
        })
    }
}

/// `tr` rows of every `tbody` section, in document order.
fn body_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(table)
        .filter(|section| section.value().name() == "tbody")
        .flat_map(child_elements)
        .filter(|row| row.value().name() == "tr")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Amount;

    fn pair(status: &str, name: &str, amount: &str) -> String {
        format!(
            r#"<tr><td rowspan="2">取消</td><td>{}</td><td>{}</td></tr>
<tr><td>買付</td><td>金額指定</td><td>{}</td></tr>"#,
            status, name, amount
        )
    }

    fn orders_page(body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
<table class="fund-order-list">
<thead><tr><th>操作</th><th>状況</th><th>銘柄</th></tr></thead>
<tbody>{}</tbody>
</table></body></html>"#,
            body
        ))
    }

    #[test]
    fn test_extract_skips_unparsable_pairs_and_keeps_order() {
        let body = [
            pair("注文中", "eMAXIS Slim 全世界株式", "10,000円"),
            pair("---", "区切り", "N/A"),
            pair("受付済", "ひふみプラス", "5,000円 (300ポイント)"),
        ]
        .concat();

        let orders = OrderExtractor::extract(&orders_page(&body)).unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].name, "eMAXIS Slim 全世界株式");
        assert_eq!(orders[0].status, "注文中");
        assert_eq!(orders[0].amount, Amount::new(10_000, 0));
        assert_eq!(orders[1].name, "ひふみプラス");
        assert_eq!(orders[1].status, "受付済");
        assert_eq!(orders[1].amount, Amount::new(5_000, 300));
    }

    #[test]
    fn test_extract_stops_at_dangling_header_row() {
        let body = format!(
            "{}<tr><td>取消</td><td>注文中</td><td>未完</td></tr>",
            pair("注文中", "A", "1,000円")
        );

        let orders = OrderExtractor::extract(&orders_page(&body)).unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].name, "A");
    }

    #[test]
    fn test_extract_ignores_thead_rows() {
        let orders = OrderExtractor::extract(&orders_page(&pair("注文中", "B", "2,000円"))).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].amount, Amount::new(2_000, 0));
    }

    #[test]
    fn test_extract_empty_table_yields_no_orders() {
        let orders = OrderExtractor::extract(&orders_page("")).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let body = format!(
            "<tr><td>x</td></tr><tr><td>y</td><td>z</td><td>9,999円</td></tr>{}",
            pair("注文中", "C", "3,000円")
        );
        let orders = OrderExtractor::extract(&orders_page(&body)).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].name, "C");
    }

    #[test]
    fn test_missing_order_table_fails() {
        let document = Html::parse_document("<html><body><table></table></body></html>");
        let err = OrderExtractor::extract(&document).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Element not found: order table (step: table.fund-order-list)"
        );
    }
}
