// ==========================================
// 控制工程文档系统 - 表格导出
// ==========================================
// 项目导出: I/O 清单段 + 空行 + 因果矩阵段，字段不加引号不转义
// 注意: 含逗号的字段导出后再导入会错位，这是已知的不对称
// 网络拓扑导出: 表头不加引号，数据单元格一律加引号，行间 '\n'，末尾无换行
// ==========================================

use crate::domain::{CauseEffectRule, IoPoint, NetworkDevice};
use crate::generator::error::{ExportError, ExportResult};
use crate::generator::format_number;
use crate::generator::lookup::IoPointIndex;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

pub const IO_SECTION_LABEL: &str = "=== IO LIST ===";
pub const CAUSE_EFFECT_SECTION_LABEL: &str = "=== CAUSE AND EFFECT MATRIX ===";

pub const IO_EXPORT_HEADERS: [&str; 8] = [
    "Tag Name",
    "Description",
    "Type",
    "Address",
    "Normal State",
    "Units",
    "Range Min",
    "Range Max",
];

pub const CAUSE_EFFECT_EXPORT_HEADERS: [&str; 8] = [
    "Cause Tag",
    "Cause Description",
    "Effect Tag",
    "Effect Description",
    "Logic Type",
    "Time Delay (s)",
    "Priority",
    "Description",
];

pub const NETWORK_EXPORT_HEADERS: [&str; 9] = [
    "Device Name",
    "Device Type",
    "IP Address",
    "Subnet Mask",
    "Gateway",
    "MAC Address",
    "Port",
    "Protocol",
    "Description",
];

fn table_writer(quote_style: QuoteStyle) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> ExportResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// I/O 清单段（含段标题与表头，每行以 '\n' 结尾）
pub fn render_io_section(points: &[IoPoint]) -> ExportResult<String> {
    let mut writer = table_writer(QuoteStyle::Never);
    writer.write_record(IO_EXPORT_HEADERS)?;

    for point in points {
        writer.write_record([
            point.tag_name.as_str(),
            point.description.as_str(),
            point.io_type.as_str(),
            point.address.as_str(),
            point.normal_state.as_str(),
            point.engineering_units.as_str(),
            format_number(point.range_min).as_str(),
            format_number(point.range_max).as_str(),
        ])?;
    }

    Ok(format!("{}\n{}", IO_SECTION_LABEL, finish(writer)?))
}

/// 因果矩阵段（悬空引用的位号/描述为空串）
pub fn render_cause_effect_section(
    points: &[IoPoint],
    rules: &[CauseEffectRule],
) -> ExportResult<String> {
    let index = IoPointIndex::new(points);
    let mut writer = table_writer(QuoteStyle::Never);
    writer.write_record(CAUSE_EFFECT_EXPORT_HEADERS)?;

    for rule in rules {
        writer.write_record([
            index.tag_of(&rule.cause_id),
            index.description_of(&rule.cause_id),
            index.tag_of(&rule.effect_id),
            index.description_of(&rule.effect_id),
            rule.logic_type.as_str(),
            format_number(rule.time_delay).as_str(),
            rule.priority.to_string().as_str(),
            rule.description.as_str(),
        ])?;
    }

    Ok(format!("{}\n{}", CAUSE_EFFECT_SECTION_LABEL, finish(writer)?))
}

/// 项目导出（{项目名}_export.csv 的内容）
pub fn export_project_tables(points: &[IoPoint], rules: &[CauseEffectRule]) -> ExportResult<String> {
    let io_section = render_io_section(points)?;
    let cause_effect_section = render_cause_effect_section(points, rules)?;
    Ok(format!("{}\n{}", io_section, cause_effect_section))
}

/// 网络拓扑导出（network_topology.csv 的内容）
pub fn export_network_topology(devices: &[NetworkDevice]) -> ExportResult<String> {
    let mut writer = table_writer(QuoteStyle::Always);

    for device in devices {
        writer.write_record([
            device.device_name.as_str(),
            device.device_type.as_str(),
            device.ip_address.as_str(),
            device.subnet_mask.as_str(),
            device.gateway.as_str(),
            device.mac_address.as_str(),
            device.port.as_str(),
            device.protocol.as_str(),
            device.description.as_str(),
        ])?;
    }

    let rows = finish(writer)?;
    let mut out = NETWORK_EXPORT_HEADERS.join(",");
    if !rows.is_empty() {
        out.push('\n');
        out.push_str(rows.trim_end_matches('\n'));
    }
    Ok(out)
}
