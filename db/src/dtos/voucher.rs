#[derive(Debug)]
pub struct VoucherImportRequest {
    pub plan_id: String,
    pub codes: Vec<String>,
}
