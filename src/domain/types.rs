// ==========================================
// 控制工程文档系统 - 领域类型定义
// ==========================================
// 职责: I/O 类型、逻辑类型等枚举
// 序列化格式: 与存储层一致的大写字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// I/O 类型 (IO Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoType {
    #[serde(rename = "DI")]
    Di, // 数字量输入
    #[serde(rename = "DO")]
    Do, // 数字量输出
    #[serde(rename = "AI")]
    Ai, // 模拟量输入
    #[serde(rename = "AO")]
    Ao, // 模拟量输出
}

impl IoType {
    /// 声明区固定分组顺序
    pub const ALL: [IoType; 4] = [IoType::Di, IoType::Do, IoType::Ai, IoType::Ao];

    /// 严格解析（大小写不敏感，两端空白忽略）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DI" => Some(IoType::Di),
            "DO" => Some(IoType::Do),
            "AI" => Some(IoType::Ai),
            "AO" => Some(IoType::Ao),
            _ => None,
        }
    }

    /// 宽松解析：缺失或非法值一律回落为 DI
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IoType::Di => "DI",
            IoType::Do => "DO",
            IoType::Ai => "AI",
            IoType::Ao => "AO",
        }
    }

    /// 是否为模拟量（量程/单位仅对模拟量有意义）
    pub fn is_analog(&self) -> bool {
        matches!(self, IoType::Ai | IoType::Ao)
    }

    /// 报告中的分组名称
    pub fn label(&self) -> &'static str {
        match self {
            IoType::Di => "Digital Inputs",
            IoType::Do => "Digital Outputs",
            IoType::Ai => "Analog Inputs",
            IoType::Ao => "Analog Outputs",
        }
    }
}

impl Default for IoType {
    fn default() -> Self {
        IoType::Di
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 逻辑类型 (Logic Type)
// ==========================================
// 存储层为自由文本，未知取值原样保留
// 当前规则模型只有单一原因点: AND/OR 与 DIRECT 行为一致
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicType {
    And,
    Or,
    Not,
    Direct,
    Other(String),
}

impl LogicType {
    pub fn as_str(&self) -> &str {
        match self {
            LogicType::And => "AND",
            LogicType::Or => "OR",
            LogicType::Not => "NOT",
            LogicType::Direct => "DIRECT",
            LogicType::Other(raw) => raw,
        }
    }

    pub fn is_negation(&self) -> bool {
        matches!(self, LogicType::Not)
    }
}

impl Default for LogicType {
    fn default() -> Self {
        LogicType::Direct
    }
}

impl From<String> for LogicType {
    fn from(raw: String) -> Self {
        // 只识别精确的大写取值，其它值不做规范化
        match raw.as_str() {
            "AND" => LogicType::And,
            "OR" => LogicType::Or,
            "NOT" => LogicType::Not,
            "DIRECT" => LogicType::Direct,
            _ => LogicType::Other(raw),
        }
    }
}

impl From<&str> for LogicType {
    fn from(raw: &str) -> Self {
        LogicType::from(raw.to_string())
    }
}

impl From<LogicType> for String {
    fn from(value: LogicType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LogicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_type_parse_case_insensitive() {
        assert_eq!(IoType::parse(" ai "), Some(IoType::Ai));
        assert_eq!(IoType::parse("Do"), Some(IoType::Do));
        assert_eq!(IoType::parse("XX"), None);
    }

    #[test]
    fn test_io_type_default_is_di() {
        assert_eq!(IoType::parse_or_default(""), IoType::Di);
        assert_eq!(IoType::parse_or_default("XX"), IoType::Di);
    }

    #[test]
    fn test_logic_type_keeps_unknown_value() {
        let logic = LogicType::from("XOR");
        assert_eq!(logic, LogicType::Other("XOR".to_string()));
        assert_eq!(logic.to_string(), "XOR");
        assert!(!logic.is_negation());
    }

    #[test]
    fn test_logic_type_serde_as_plain_string() {
        let json = serde_json::to_string(&LogicType::Not).unwrap();
        assert_eq!(json, "\"NOT\"");
        let back: LogicType = serde_json::from_str("\"OR\"").unwrap();
        assert_eq!(back, LogicType::Or);
    }
}
