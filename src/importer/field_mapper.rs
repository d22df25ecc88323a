// ==========================================
// 控制工程文档系统 - 表头映射器
// ==========================================
// 职责: 源表头 → 标准字段（关键字子串匹配）+ 类型转换
// 规则:
// - 表头先去空白再转小写
// - 按固定顺序逐字段检查，同一字段取第一个命中的列
// - "modbus address" 同时命中 address/modbus，address 规则排除 modbus 以打破平局
// ==========================================

use crate::domain::io_point::{DEFAULT_RANGE_MAX, DEFAULT_RANGE_MIN};
use crate::domain::network::{DEFAULT_DEVICE_TYPE, DEFAULT_SUBNET_MASK};
use crate::domain::{IoType, NewIoPoint, NewNetworkDevice};
use crate::importer::importer_trait::RecordMapper;
use tracing::debug;

// ==========================================
// 标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    TagName,
    Description,
    IoType,
    Address,
    ModbusRegister,
    NormalState,
    EngineeringUnits,
    RangeMin,
    RangeMax,
}

impl CanonicalField {
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::TagName => "tag_name",
            CanonicalField::Description => "description",
            CanonicalField::IoType => "io_type",
            CanonicalField::Address => "address",
            CanonicalField::ModbusRegister => "modbus_register",
            CanonicalField::NormalState => "normal_state",
            CanonicalField::EngineeringUnits => "engineering_units",
            CanonicalField::RangeMin => "range_min",
            CanonicalField::RangeMax => "range_max",
        }
    }
}

type HeaderPredicate = fn(&str) -> bool;

/// 字段 → 表头判定规则（顺序即优先级，不可调整）
pub const IO_POINT_COLUMN_RULES: [(CanonicalField, HeaderPredicate); 9] = [
    (CanonicalField::TagName, |h| h.contains("tag")),
    (CanonicalField::Description, |h| h.contains("desc")),
    (CanonicalField::IoType, |h| h.contains("type")),
    (CanonicalField::Address, |h| {
        h.contains("address") && !h.contains("modbus")
    }),
    (CanonicalField::ModbusRegister, |h| h.contains("modbus")),
    (CanonicalField::NormalState, |h| h.contains("normal")),
    (CanonicalField::EngineeringUnits, |h| h.contains("unit")),
    (CanonicalField::RangeMin, |h| h.contains("min")),
    (CanonicalField::RangeMax, |h| h.contains("max")),
];

// ==========================================
// ColumnMap - 字段列索引解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<(CanonicalField, Option<usize>)>,
}

impl ColumnMap {
    /// 根据表头解析每个标准字段的列索引
    pub fn resolve(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let columns = IO_POINT_COLUMN_RULES
            .iter()
            .map(|(field, predicate)| {
                let index = normalized.iter().position(|h| predicate(h));
                (*field, index)
            })
            .collect();

        Self { columns }
    }

    /// 字段对应列索引（None = 未找到）
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, index)| *index)
    }

    /// 取单元格文本（去空白；列缺失或行过短时为空串）
    fn cell<'r>(&self, row: &'r [String], field: CanonicalField) -> &'r str {
        self.index_of(field)
            .and_then(|idx| row.get(idx))
            .map(|v| v.trim())
            .unwrap_or("")
    }
}

/// 解析浮点数，取开头最长的数值前缀（"4 mA" → 4）
///
/// 无数值前缀或非有限值时返回默认值
fn parse_f64_or(value: &str, default: f64) -> f64 {
    leading_float(value.trim())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// 符号 + 整数部分 + 小数部分 + 指数（指数须带数字才计入）
fn leading_float(value: &str) -> Option<f64> {
    let bytes = value.as_bytes();
    let digits_at = |start: usize| -> usize {
        bytes
            .get(start..)
            .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
            .unwrap_or(0)
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_at(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_at(end + 1);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_at(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    value[..end].parse().ok()
}

// ==========================================
// HeaderMapper - I/O 点表头映射器
// ==========================================
pub struct HeaderMapper;

impl HeaderMapper {
    fn map_row(&self, columns: &ColumnMap, row: &[String]) -> Option<NewIoPoint> {
        let tag_name = columns.cell(row, CanonicalField::TagName);
        if tag_name.is_empty() {
            return None;
        }

        Some(NewIoPoint {
            tag_name: tag_name.to_string(),
            description: columns.cell(row, CanonicalField::Description).to_string(),
            io_type: IoType::parse_or_default(columns.cell(row, CanonicalField::IoType)),
            address: columns.cell(row, CanonicalField::Address).to_string(),
            modbus_register: columns.cell(row, CanonicalField::ModbusRegister).to_string(),
            normal_state: columns.cell(row, CanonicalField::NormalState).to_string(),
            engineering_units: columns.cell(row, CanonicalField::EngineeringUnits).to_string(),
            range_min: parse_f64_or(columns.cell(row, CanonicalField::RangeMin), DEFAULT_RANGE_MIN),
            range_max: parse_f64_or(columns.cell(row, CanonicalField::RangeMax), DEFAULT_RANGE_MAX),
        })
    }
}

impl RecordMapper<NewIoPoint> for HeaderMapper {
    fn map_rows(&self, rows: &[Vec<String>]) -> Vec<NewIoPoint> {
        let Some((headers, data_rows)) = rows.split_first() else {
            return Vec::new();
        };

        let columns = ColumnMap::resolve(headers);
        debug!(columns = ?columns, "表头映射完成");

        data_rows
            .iter()
            .filter_map(|row| self.map_row(&columns, row))
            .collect()
    }
}

// ==========================================
// NetworkDeviceMapper - 网络设备按列位置映射
// ==========================================
// 列顺序: 名称, 类型, IP, 子网掩码, 网关, MAC, 端口, 协议, 描述
pub struct NetworkDeviceMapper;

impl RecordMapper<NewNetworkDevice> for NetworkDeviceMapper {
    fn map_rows(&self, rows: &[Vec<String>]) -> Vec<NewNetworkDevice> {
        let cell = |row: &[String], idx: usize| -> String {
            row.get(idx).map(|v| v.trim().to_string()).unwrap_or_default()
        };
        let cell_or = |row: &[String], idx: usize, default: &str| -> String {
            let value = cell(row, idx);
            if value.is_empty() {
                default.to_string()
            } else {
                value
            }
        };

        rows.iter()
            .skip(1)
            .filter(|row| !cell(row, 0).is_empty())
            .map(|row| NewNetworkDevice {
                device_name: cell(row, 0),
                device_type: cell_or(row, 1, DEFAULT_DEVICE_TYPE),
                ip_address: cell(row, 2),
                subnet_mask: cell_or(row, 3, DEFAULT_SUBNET_MASK),
                gateway: cell(row, 4),
                mac_address: cell(row, 5),
                port: cell(row, 6),
                protocol: cell(row, 7),
                description: cell(row, 8),
            })
            .collect()
    }
}
