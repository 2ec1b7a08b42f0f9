/// Text sent after a successful purchase.
pub fn voucher_message(brand: &str, plan_name: &str, code: &str) -> String {
    format!(
        "Your {brand} voucher for {plan_name} plan is: ** {code}.**\n Thank you for choosing {brand}!"
    )
}

/// Text sent when a returning customer still holds unexpired vouchers.
pub fn active_vouchers_message<'a>(brand: &str, codes: impl IntoIterator<Item = &'a str>) -> String {
    let codes: Vec<&str> = codes.into_iter().collect();
    format!("Active {brand} codes: {}", codes.join(","))
}
