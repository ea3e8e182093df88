pub mod admin;
pub mod auth;
pub mod records;
pub mod school;
pub mod server;
pub mod student;
pub mod subject;
pub mod teacher;

use clap::Args;

use crate::cli::utils::parse_params;
use crate::client::Params;

/// Paging and filters shared by every list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, help = "Page number")]
    pub page: Option<u32>,

    #[arg(long = "param", value_name = "KEY=VALUE", help = "Extra query parameter (repeatable)")]
    pub params: Vec<String>,
}

impl ListArgs {
    pub fn query(&self) -> anyhow::Result<Params> {
        let mut params = parse_params(&self.params)?;
        if let Some(page) = self.page {
            params.insert("page".to_string(), page.to_string());
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_flag_wins_over_param() {
        let args = ListArgs {
            page: Some(3),
            params: vec!["page=1".to_string(), "school=7".to_string()],
        };
        let params = args.query().unwrap();
        assert_eq!(params["page"], "3");
        assert_eq!(params["school"], "7");
    }
}
