use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 帳戶摘要頁：網址或本機檔案
    fn page_location(&self) -> &str;
    /// 已解析為絕對網址的委託一覽頁
    fn orders_url(&self) -> String;
    fn encoding_label(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
}

/// 取得文件原始位元組的能力（網路或本機）
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}
