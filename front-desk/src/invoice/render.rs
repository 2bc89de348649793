//! Plain-text invoice layout

use chrono::NaiveDate;
use rust_decimal::Decimal;

use shared::money::format_amount;

use super::document::{Invoice, InvoiceKind};
use crate::utils::TextBuilder;

/// Render an invoice for a fixed-width printer or terminal
pub fn render_invoice(invoice: &Invoice, width: usize) -> String {
    let mut b = TextBuilder::new(width);

    b.center("TAX INVOICE");
    if invoice.kind == InvoiceKind::Restaurant {
        b.center("Restaurant");
    }
    b.sep_double();

    let date = format_date(invoice.header.bill_date);
    b.line_lr(&format!("Bill {}", invoice.header.bill_no), &date);
    b.line_lr(&format!("GRC {}", invoice.header.grc_no), &invoice.header.room_no);
    if invoice.kind == InvoiceKind::Booking {
        b.line_lr(
            &format!("In {}", format_date(invoice.header.check_in)),
            &format!("Out {}", format_date(invoice.header.check_out)),
        );
        b.line_lr(
            "Guests",
            &format!("{}A {}C", invoice.header.adults, invoice.header.children),
        );
    }
    b.sep_single();

    let c = &invoice.client;
    b.line(&format!("Name: {}", c.name));
    b.line(&format!("Company: {}", c.company));
    b.line(&format!("Address: {}, {}", c.address, c.city));
    b.line(&format!("Mobile: {}", c.mobile_no));
    b.line(&format!("GSTIN: {}", c.gstin));
    b.sep_single();

    let amount_width = 10;
    let rate_width = 9;
    let name_width = b.width().saturating_sub(amount_width + rate_width + 2);
    b.columns(&[("Particulars", name_width), ("Rate", rate_width), ("Amount", amount_width)]);
    b.sep_single();
    for line in &invoice.lines {
        let name = if line.quantity > 1 {
            format!("{} x{}", line.particulars, line.quantity)
        } else {
            line.particulars.clone()
        };
        let rate = format_amount(line.declared_rate);
        let amount = if line.is_free {
            "FREE".to_string()
        } else {
            format_amount(line.amount)
        };
        b.columns(&[
            (name.as_str(), name_width),
            (rate.as_str(), rate_width),
            (amount.as_str(), amount_width),
        ]);
        if line.is_free {
            b.line(&format!("  (was {})", format_amount(line.declared_rate * Decimal::from(line.quantity))));
        }
        b.line(&format!("  HSN/SAC {}", line.hsn));
    }
    b.sep_single();
    b.line_lr("Sub Total", &format_amount(invoice.lines_total()));

    let t = &invoice.taxes;
    b.line_lr("Taxable Amount", &format_amount(t.taxable_amount));
    b.line_lr(&format!("CGST ({})", t.cgst_rate), &format_amount(t.cgst));
    b.line_lr(&format!("SGST ({})", t.sgst_rate), &format_amount(t.sgst));
    for charge in &invoice.other_charges {
        b.line_lr(&charge.particulars, &format_amount(charge.amount));
    }
    b.line_lr("Round Off", &signed(invoice.round_off));
    b.sep_double();
    b.line_lr("NET AMOUNT", &format_amount(invoice.net_amount));

    if let Some(balance) = invoice.balance_due {
        b.line_lr(
            &format!("Advance ({})", invoice.advances.len()),
            &format_amount(invoice.advance_total),
        );
        b.line_lr("Balance Due", &format_amount(balance));
    }
    b.sep_double();
    b.center("Thank You, Visit Again");
    b.build()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

fn signed(value: Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        format_amount(value)
    } else {
        format!("+{}", format_amount(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TaxRate;
    use shared::models::RestaurantOrder;
    use serde_json::json;

    #[test]
    fn test_render_restaurant_invoice() {
        let order: RestaurantOrder = serde_json::from_value(json!({
            "_id": "65f1c0ffee123456",
            "tableNo": 3,
            "customerName": "Ravi",
            "amount": 101,
            "items": [
                {"itemName": "Masala Dosa", "price": 101, "quantity": 1},
                {"itemName": "Filter Coffee", "price": 40, "quantity": 2, "isFree": true}
            ]
        }))
        .unwrap();
        let rate = TaxRate::from_percent(Decimal::new(25, 1));
        let invoice = Invoice::for_restaurant_order(&order, (rate, rate));

        let text = render_invoice(&invoice, 48);
        assert!(text.contains("Bill REST-123456"));
        assert!(text.contains("Name: Ravi"));
        assert!(text.contains("CGST (2.5%)"));
        assert!(text.contains("(was 80.00)"));
        let coffee = text.lines().find(|l| l.contains("Filter Coffee")).unwrap();
        assert!(coffee.ends_with("FREE"));
        let round = text.lines().find(|l| l.starts_with("Round Off")).unwrap();
        assert!(round.ends_with("-0.06"));
        let net = text.lines().find(|l| l.starts_with("NET AMOUNT")).unwrap();
        assert!(net.ends_with("106.00"));
        assert!(!text.contains("Balance Due"));
        assert!(text.lines().all(|l| l.chars().count() <= 48));
    }
}
