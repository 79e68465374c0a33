//! XML rendering of discovery results.
//!
//! Document shape:
//!
//! ```text
//! <result>
//!   <has_error>0</has_error>
//!   <version>1</version>
//!   <endpoint>
//!     <host>...</host>
//!     <api_host>...</api_host>
//!     <portal_host>...</portal_host>
//!     <n3ds_host>...</n3ds_host>
//!   </endpoint>
//! </result>
//! ```
//!
//! Errors replace `endpoint` with `code`, `error_code` and `message`. Empty
//! hosts are left out, and so is `endpoint` when every host is empty.

use discovery_core::{DiscoveryResult, EndpointSet, RESPONSE_VERSION};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::SrvError;

const INDENT_SIZE: usize = 2;

/// Pre-rendered generic server error, sent when encoding itself fails.
pub const FALLBACK_BODY: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<result>
  <has_error>1</has_error>
  <version>1</version>
  <code>500</code>
  <error_code>1</error_code>
  <message>SERVER_ERROR</message>
</result>";

/// Render `result` as an XML document.
pub fn encode_result(result: &DiscoveryResult) -> crate::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("result")))?;

    let has_error = if result.has_error() { "1" } else { "0" };
    text_element(&mut writer, "has_error", has_error)?;
    text_element(&mut writer, "version", &RESPONSE_VERSION.to_string())?;

    match result {
        DiscoveryResult::Endpoints(set) => write_endpoints(&mut writer, set)?,
        DiscoveryResult::Error {
            code,
            error_code,
            message,
        } => {
            text_element(&mut writer, "code", &code.to_string())?;
            text_element(&mut writer, "error_code", &error_code.to_string())?;
            text_element(&mut writer, "message", message)?;
        }
    }

    write(&mut writer, Event::End(BytesEnd::new("result")))?;
    Ok(writer.into_inner())
}

fn write_endpoints(writer: &mut Writer<Vec<u8>>, set: &EndpointSet) -> crate::Result<()> {
    let hosts: Vec<(&str, &str)> = [
        ("host", set.discovery_host.as_str()),
        ("api_host", set.api_host.as_str()),
        ("portal_host", set.portal_host.as_str()),
        ("n3ds_host", set.n3ds_host.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect();

    if hosts.is_empty() {
        return Ok(());
    }

    write(writer, Event::Start(BytesStart::new("endpoint")))?;
    for (name, value) in hosts {
        text_element(writer, name, value)?;
    }
    write(writer, Event::End(BytesEnd::new("endpoint")))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> crate::Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(value)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> crate::Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SrvError::Serialization(e.to_string()))
}
