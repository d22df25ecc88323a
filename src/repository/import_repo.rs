// ==========================================
// 控制工程文档系统 - 导入 Repository Trait
// ==========================================
// 职责: 定义导入落库接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据写入
// ==========================================

use crate::domain::{NewIoPoint, NewNetworkDevice};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// IoPointImportRepository Trait
// ==========================================
// 实现者: IoPointRepository（使用 rusqlite）
#[async_trait]
pub trait IoPointImportRepository: Send + Sync {
    /// 批量插入 I/O 点（单事务）
    ///
    /// # 参数
    /// - project_id: 所属项目
    /// - points: 候选记录
    ///
    /// # 返回
    /// - Ok(usize): 插入数量
    /// - Err: 数据库错误（整个事务回滚，不留部分数据）
    async fn batch_insert_io_points(
        &self,
        project_id: &str,
        points: Vec<NewIoPoint>,
    ) -> RepositoryResult<usize>;
}

// ==========================================
// NetworkDeviceImportRepository Trait
// ==========================================
// 实现者: NetworkDeviceRepository（使用 rusqlite）
#[async_trait]
pub trait NetworkDeviceImportRepository: Send + Sync {
    /// 批量插入网络设备（单事务）
    async fn batch_insert_devices(
        &self,
        project_id: &str,
        devices: Vec<NewNetworkDevice>,
    ) -> RepositoryResult<usize>;
}
