//! Invoice document renderer.

use crate::domain::company::CompanyProfile;
use crate::domain::invoice::Invoice;
use crate::domain::money::format_paise;
use crate::domain::order::{Order, PaymentStatus};

use super::layout::{PageBuilder, PAGE_WIDTH};

const DATE_FORMAT: &str = "%d %b %Y";

/// Renders the invoice as fixed-layout paginated bytes.
///
/// Pure function of its inputs; safe to re-invoke for regeneration.
pub fn render_invoice(order: &Order, invoice: &Invoice, company: &CompanyProfile) -> Vec<u8> {
    let mut page = PageBuilder::new();

    // Header band with issuer branding
    page.heavy_rule();
    page.centered(&company.name.to_uppercase());
    page.centered(&company.address);
    page.centered(&format!("{}  |  {}", company.phone, company.email));
    page.heavy_rule();
    page.blank();
    page.centered("TAX INVOICE");
    page.blank();

    page.field("Invoice No.", invoice.number.as_str());
    page.field("Issue Date", &invoice.issued_at.format(DATE_FORMAT).to_string());
    page.field("Due Date", &invoice.due_at.format(DATE_FORMAT).to_string());
    page.field("Order No.", &order.order_number);
    page.blank();
    page.rule();

    // Billed-to block
    page.line("BILLED TO");
    page.blank();
    page.line(&order.customer_name);
    page.wrapped(&order.customer_address, 0);
    page.line(&order.customer_email);
    page.line(&order.customer_phone);
    page.blank();
    page.rule();

    // Invoice details block
    page.line("INVOICE DETAILS");
    page.blank();
    page.field("Agreement", "Annual maintenance contract");
    page.field("Appliances covered", &order.item_count.to_string());
    if let Some(payment_id) = &order.gateway_payment_id {
        page.field("Payment Reference", payment_id);
    }
    page.blank();

    // Validity-period band
    page.rule();
    page.centered(&format!(
        "VALID FROM {} TO {}",
        invoice.valid_from.format(DATE_FORMAT),
        invoice.valid_until.format(DATE_FORMAT)
    ));
    page.rule();
    page.blank();

    // Line-item table: single row for the annual contract
    page.line(&format!(
        "{:<8}{:<54}{:<8}{:>20}",
        "S.No", "Description", "Qty", "Amount"
    ));
    page.rule();
    page.line(&format!(
        "{:<8}{:<54}{:<8}{:>20}",
        "1",
        "Annual maintenance contract (12 months)",
        order.item_count,
        format_paise(invoice.amount)
    ));
    page.rule();

    // Total band
    page.line(&format!(
        "{:>width$}",
        format!("TOTAL    {}", format_paise(invoice.amount)),
        width = PAGE_WIDTH
    ));
    page.heavy_rule();
    page.blank();

    // Payment-status stamp
    let stamp = match order.payment_status {
        PaymentStatus::Paid => "*** PAID ***",
        PaymentStatus::Pending => "*** PAYMENT PENDING ***",
    };
    page.centered(stamp);
    page.blank();
    page.centered("This is a computer generated invoice.");

    page.finish()
}
