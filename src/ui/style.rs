use crate::usecase::notice::NoticeLevel;

pub fn table_container_style() -> &'static str {
    "max-height: 70vh; overflow: auto; border: 1px solid #bbb; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; background: #f4f6f8; border: 1px solid #bbb; padding: 6px; cursor: pointer; user-select: none;"
}

pub fn cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 4px; text-align: center;"
}

pub fn price_input_style(dirty: bool) -> &'static str {
    if dirty {
        "width: 100px; text-align: center; border: 1px solid #ffa500; background: #fffaf0;"
    } else {
        "width: 100px; text-align: center; border: 1px solid #bbb;"
    }
}

pub fn notice_style(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => {
            "background: #d4edda; border: 1px solid #c3e6cb; color: #155724; padding: 10px; border-radius: 8px; margin-bottom: 12px; display: flex; gap: 8px;"
        }
        NoticeLevel::Error => {
            "background: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; padding: 10px; border-radius: 8px; margin-bottom: 12px; display: flex; gap: 8px;"
        }
        NoticeLevel::Info => {
            "background: #d1ecf1; border: 1px solid #bee5eb; color: #0c5460; padding: 10px; border-radius: 8px; margin-bottom: 12px; display: flex; gap: 8px;"
        }
    }
}
