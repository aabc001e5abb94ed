//! Service contract document renderer.

use crate::domain::company::CompanyProfile;
use crate::domain::invoice::Invoice;
use crate::domain::money::format_paise;
use crate::domain::order::Order;

use super::layout::PageBuilder;

const DATE_FORMAT: &str = "%d %b %Y";

/// Numbered terms and conditions, word-wrapped on render.
const TERMS: &[&str] = &[
    "The provider agrees to service and maintain the appliances registered under this \
     agreement for the full validity period stated above, including scheduled preventive \
     maintenance visits and breakdown repairs.",
    "The client shall provide safe and reasonable access to the registered appliances at \
     the service address during agreed visiting hours.",
    "Replacement parts, where required, are billed separately at prevailing rates unless \
     expressly covered under the agreement schedule.",
    "Service requests are attended within two working days of being raised through the \
     provider's service desk.",
    "This agreement is not transferable to another address or appliance set without the \
     provider's prior written consent.",
    "Either party may terminate this agreement with thirty days written notice; fees for \
     the unexpired term are refundable on a pro-rata basis less services already rendered.",
    "Any dispute arising out of this agreement is subject to the exclusive jurisdiction \
     of the courts at the provider's registered place of business.",
];

/// Renders the service contract as fixed-layout paginated bytes.
///
/// Pure function of its inputs; safe to re-invoke for regeneration. The
/// contract identifier is derived from the invoice number so the two
/// documents always cross-reference the same issuance.
pub fn render_contract(order: &Order, invoice: &Invoice, company: &CompanyProfile) -> Vec<u8> {
    let mut page = PageBuilder::new();

    // Title block
    page.heavy_rule();
    page.centered("ANNUAL MAINTENANCE CONTRACT");
    page.centered("Service Agreement");
    page.heavy_rule();
    page.blank();
    page.field("Contract No.", &contract_number(invoice));
    page.field("Date", &invoice.issued_at.format(DATE_FORMAT).to_string());
    page.blank();
    page.rule();

    // Two-party blocks
    page.line("THE PROVIDER");
    page.blank();
    page.line(&company.name);
    page.wrapped(&company.address, 0);
    page.line(&format!("{}  |  {}", company.phone, company.email));
    page.blank();
    page.line("THE CLIENT");
    page.blank();
    page.line(&order.customer_name);
    page.wrapped(&order.customer_address, 0);
    page.line(&format!("{}  |  {}", order.customer_phone, order.customer_email));
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

    // Scope of services
    page.line("1. SCOPE OF SERVICES");
    page.blank();
    page.wrapped(
        &format!(
            "The provider shall maintain the {} appliance(s) registered under order {} and \
             used by the client for {}, for a total contract value of {}.",
            order.item_count,
            order.order_number,
            order.usage_purpose,
            format_paise(invoice.amount)
        ),
        3,
    );
    page.blank();

    // Terms and conditions
    page.line("2. TERMS AND CONDITIONS");
    page.blank();
    for (i, term) in TERMS.iter().enumerate() {
        page.line(&format!("2.{}", i + 1));
        page.wrapped(term, 3);
        page.blank();
    }

    // Signature blocks
    page.blank();
    page.line(&format!("{:<45}{}", "For the Provider", "For the Client"));
    page.blank();
    page.blank();
    page.line(&format!("{:<45}{}", "_______________________", "_______________________"));
    page.line(&format!("{:<45}{}", company.signatory, order.customer_name.as_str()));
    page.line(&format!("{:<45}{}", company.name, "Client"));

    page.finish()
}

/// Contract identifier derived from the invoice number.
fn contract_number(invoice: &Invoice) -> String {
    invoice.number.as_str().replacen("INV-", "AMC-", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceNumber;
    use crate::domain::order::{OrderStatus, PaymentStatus};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn fixtures() -> (Order, Invoice, CompanyProfile) {
        let issued = Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap();
        let order = Order {
            id: Uuid::new_v4(),
            order_number: "ORD-1".to_string(),
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            customer_address: "12 MG Road, Bengaluru 560001".to_string(),
            usage_purpose: "domestic kitchen appliances".to_string(),
            item_count: 3,
            total_amount: 99_900,
            payment_status: PaymentStatus::Paid,
            status: OrderStatus::Active,
            valid_from: Some(issued),
            valid_until: Some(issued + Duration::days(365)),
            gateway_order_id: Some("order_G7h2".to_string()),
            gateway_payment_id: Some("pay_K2j9".to_string()),
            created_at: issued,
            updated_at: issued,
        };
        let invoice = Invoice::issue(
            order.id,
            InvoiceNumber::mint(issued.date_naive(), 12),
            99_900,
            issued,
            issued + Duration::days(365),
            issued,
        );
        (order, invoice, CompanyProfile::default())
    }

    fn rendered() -> String {
        let (order, invoice, company) = fixtures();
        String::from_utf8(render_contract(&order, &invoice, &company)).unwrap()
    }

    #[test]
    fn contract_number_mirrors_invoice_number() {
        let text = rendered();
        assert!(text.contains("AMC-20260825-0012"));
    }

    #[test]
    fn includes_both_party_blocks() {
        let text = rendered();
        assert!(text.contains("THE PROVIDER"));
        assert!(text.contains("THE CLIENT"));
        assert!(text.contains("Asha Rao"));
        assert!(text.contains(&CompanyProfile::default().name));
    }

    #[test]
    fn scope_paragraph_interpolates_usage_purpose() {
        let text = rendered();
        assert!(text.contains("domestic kitchen appliances"));
        assert!(text.contains("Rs. 999.00"));
    }

    #[test]
    fn all_terms_are_numbered() {
        let text = rendered();
        for i in 1..=TERMS.len() {
            assert!(text.contains(&format!("2.{}", i)), "missing term 2.{}", i);
        }
    }

    #[test]
    fn includes_signature_blocks() {
        let text = rendered();
        assert!(text.contains("For the Provider"));
        assert!(text.contains("For the Client"));
        assert!(text.contains("Authorised Signatory"));
    }

    #[test]
    fn output_is_byte_exact_across_invocations() {
        let (order, invoice, company) = fixtures();
        assert_eq!(
            render_contract(&order, &invoice, &company),
            render_contract(&order, &invoice, &company)
        );
    }
}
