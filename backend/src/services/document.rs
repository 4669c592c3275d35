//! Printable certificate document
//!
//! Produces a standalone HTML page styled for A4 printing. The browser's
//! print dialog is used to obtain a PDF.

use std::fmt::Write;

use shared::{format_date, Certificate, Client, Settings};

/// Escape text for interpolation into HTML element content and attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn row(html: &mut String, label: &str, value: &str) {
    let _ = write!(
        html,
        "<tr><th>{}</th><td>{}</td></tr>",
        label,
        escape_html(value)
    );
}

fn optional_row(html: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        row(html, label, value);
    }
}

const STYLE: &str = "\
@page { size: A4; margin: 20mm; }
body { font-family: Arial, Helvetica, sans-serif; color: #222; margin: 0; }
.page { max-width: 180mm; margin: 0 auto; }
header { display: flex; justify-content: space-between; align-items: center; border-bottom: 3px solid #c0392b; padding-bottom: 8px; }
header img { max-height: 60px; }
h1 { text-align: center; font-size: 22px; margin: 24px 0 4px; }
.serial { text-align: center; font-size: 16px; color: #c0392b; margin-bottom: 24px; }
h2 { font-size: 15px; border-bottom: 1px solid #ccc; padding-bottom: 4px; margin-top: 24px; }
table { width: 100%; border-collapse: collapse; }
th { text-align: left; width: 40%; padding: 4px; font-weight: normal; color: #555; }
td { padding: 4px; }
.notes { white-space: pre-wrap; border: 1px solid #ddd; padding: 8px; }
.signature { margin-top: 48px; width: 60mm; border-top: 1px solid #222; text-align: center; padding-top: 4px; }
footer { margin-top: 32px; font-size: 11px; color: #666; text-align: center; }
";

/// Render the printable document for one certificate
pub fn render_certificate_document(
    settings: &Settings,
    client: &Client,
    certificate: &Certificate,
) -> String {
    let company = &settings.company;
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Certificado {serial}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<div class=\"page\">\n",
        serial = escape_html(&certificate.serial_number),
    );

    html.push_str("<header>\n<div class=\"company\">");
    let _ = write!(
        html,
        "<strong>{}</strong><br>{}<br>Tel: {} &middot; {}",
        escape_html(&company.name),
        escape_html(&company.address),
        escape_html(&company.phone),
        escape_html(&company.email),
    );
    html.push_str("</div>\n");
    if let Some(logo) = company.logo_url.as_deref() {
        let _ = write!(html, "<img src=\"{}\" alt=\"Logo\">\n", escape_html(logo));
    }
    html.push_str("</header>\n");

    html.push_str("<h1>Certificado de Revisión de Instalación de Gas</h1>\n");
    let _ = write!(
        html,
        "<div class=\"serial\">N.º {}</div>\n",
        escape_html(&certificate.serial_number)
    );

    html.push_str("<h2>Datos del cliente</h2>\n<table>");
    row(&mut html, "Nombre", &client.name);
    optional_row(&mut html, "DNI/NIF", client.dni.as_deref());
    row(&mut html, "Dirección", &client.address);
    row(&mut html, "Teléfono", &client.phone);
    optional_row(&mut html, "Teléfono secundario", client.secondary_phone.as_deref());
    row(&mut html, "Email", &client.email);
    html.push_str("</table>\n");

    html.push_str("<h2>Datos de la instalación</h2>\n<table>");
    optional_row(
        &mut html,
        "Tipo de instalación",
        client.installation_type.map(|t| t.display_name_es()),
    );
    optional_row(&mut html, "Tipo de gas", client.gas_type.map(|g| g.display_name_es()));
    optional_row(&mut html, "N.º de contrato", client.contract_number.as_deref());
    optional_row(&mut html, "Empresa instaladora", client.installer_company.as_deref());
    html.push_str("</table>\n");

    html.push_str("<h2>Vigencia</h2>\n<table>");
    row(&mut html, "Fecha de emisión", &format_date(certificate.issue_date));
    row(&mut html, "Fecha de vencimiento", &format_date(certificate.expiry_date));
    row(&mut html, "Estado", certificate.status.display_name_es());
    html.push_str("</table>\n");

    if let Some(notes) = certificate.technical_notes.as_deref() {
        let _ = write!(
            html,
            "<h2>Observaciones técnicas</h2>\n<div class=\"notes\">{}</div>\n",
            escape_html(notes)
        );
    }

    let _ = write!(
        html,
        "<div class=\"signature\">Firma del técnico<br>{}</div>\n",
        escape_html(&company.name)
    );

    let _ = write!(
        html,
        "<footer>Este certificado es válido desde el {} hasta el {}.</footer>\n",
        format_date(certificate.issue_date),
        format_date(certificate.expiry_date),
    );

    html.push_str("</div>\n</body>\n</html>\n");
    html
}
