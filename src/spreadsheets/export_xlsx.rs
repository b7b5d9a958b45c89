use crate::data::Listing;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 4] = ["Loja", "Cidade", "Estado", "Categorias"];

/// Build the store list workbook: one header row, then one row per store.
pub fn stores_workbook(stores: &[Listing<'_>]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, store) in stores.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [store.title(), store.city(), store.state(), store.categories()];

        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, *value)
                .map_err(|e| {
                    ServerError::XlsxError(format!("Failed to write row {}: {}", r, e))
                })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_stores_xlsx(stores: &[Listing<'_>]) -> ResultResp {
    let buffer = stores_workbook(stores)?;
    xlsx_response(buffer, "lojas_cadastradas.xlsx")
}
