//! Database seeders for showcase content.
//!
//! A fresh install gets a small set of published portfolio cases so the
//! public gallery renders with real-looking content before the back office
//! has been used. Seeding only runs against an empty cases table, so admin
//! edits and deletions stick.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed showcase cases into an empty database.
pub async fn seed_showcase_cases(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cases")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    info!("Seeding showcase cases...");

    // Format: (title, location, style, area, duration, price, images,
    //          description, testimonial, foreman_name, foreman_phone, featured)
    let cases: Vec<(&str, &str, &str, f64, i64, f64, &str, &str, &str, &str, &str, i64)> = vec![
        (
            "现代简约 · 120㎡两居室",
            "北京 · 朝阳区",
            "modern",
            120.0,
            60,
            25.0,
            r#"["https://images.unsplash.com/photo-1600210492493-0946911123ea?w=800","https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800","https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800"]"#,
            "本案例采用现代简约风格,以白色和灰色为主色调,搭配木质元素,营造出简洁舒适的居住空间。开放式厨房与客厅相连,增加了空间的通透感。",
            "张师傅的团队非常专业,从设计到施工都很细心。工期控制得很好,装修质量也让我们很满意。现在住进来感觉非常舒适,感谢团队的辛勤付出!",
            "张伟",
            "13800138001",
            1,
        ),
        (
            "北欧风格 · 95㎡温馨小家",
            "上海 · 浦东新区",
            "nordic",
            95.0,
            50,
            20.0,
            r#"["https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800","https://images.unsplash.com/photo-1600573472591-ee6b68d14c68?w=800","https://images.unsplash.com/photo-1600566753086-00f18fb6b3ea?w=800"]"#,
            "北欧风格设计,追求简洁与自然的完美结合。大量使用白色和原木色,搭配绿植点缀,打造温馨舒适的居住环境。充足的采光和合理的收纳设计是本案例的亮点。",
            "李师傅很有经验,给了我们很多实用的建议。装修过程中遇到的问题都及时解决了,最终效果比预期还要好。推荐!",
            "李强",
            "13800138002",
            1,
        ),
        (
            "工业风 · 150㎡loft公寓",
            "深圳 · 南山区",
            "industrial",
            150.0,
            75,
            35.0,
            r#"["https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800","https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800","https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800"]"#,
            "工业风格设计,保留原始混凝土墙面和裸露管道,搭配金属和木质家具。挑高设计配合吊灯,营造出独特的艺术氛围。适合追求个性的年轻人。",
            "王师傅的施工队特别专业,对工业风的理解很到位。水电改造做得很规范,细节处理也很用心。整体效果非常满意!",
            "王建国",
            "13800138003",
            1,
        ),
        (
            "侘寂风 · 110㎡禅意空间",
            "杭州 · 西湖区",
            "wabisabi",
            110.0,
            65,
            28.0,
            r#"["https://images.unsplash.com/photo-1600121848594-d8644e57abab?w=800","https://images.unsplash.com/photo-1600047509807-ba8f99d2cdde?w=800","https://images.unsplash.com/photo-1600210491892-03d54c0aaf87?w=800"]"#,
            "侘寂美学,追求自然、简朴与不完美的美。使用天然材质,保留手工痕迹,营造宁静的禅意空间。色调以米色、灰色、原木色为主。",
            "刘师傅对侘寂风格有很深的理解,施工过程中注重每一个细节。装修后的家让人感觉特别平静,非常适合生活。",
            "刘明",
            "13800138004",
            0,
        ),
        (
            "轻奢风格 · 180㎡豪华三居",
            "广州 · 天河区",
            "luxury",
            180.0,
            90,
            50.0,
            r#"["https://images.unsplash.com/photo-1600607686527-6fb886090705?w=800&q=80","https://images.unsplash.com/photo-1600607686434-0cb4250ee8e8?w=800&q=80","https://images.unsplash.com/photo-1600607687920-4e2a09cf159d?w=800&q=80"]"#,
            "轻奢风格设计,融合现代与古典元素。使用大理石、黄铜、丝绒等高级材质,营造精致优雅的居住环境。注重细节与质感的完美呈现。",
            "陈师傅的团队施工质量非常高,对材料的把控很严格。装修效果超出预期,每个细节都做得很到位。值得信赖!",
            "陈建华",
            "13800138005",
            1,
        ),
        (
            "极简风格 · 85㎡单身公寓",
            "成都 · 高新区",
            "minimalist",
            85.0,
            45,
            18.0,
            r#"["https://images.unsplash.com/photo-1600585154526-990dced4db0d?w=800","https://images.unsplash.com/photo-1600573472550-8090b5e0745e?w=800","https://images.unsplash.com/photo-1600566752355-35792bedcfea?w=800"]"#,
            "极简主义设计,去除一切多余装饰,追求功能性与美感的统一。大面积留白,简洁的线条,营造宁静舒适的空间。",
            "赵师傅很理解我对极简的追求,没有做任何多余的装饰。施工速度快,质量也很好。住进来感觉很舒服!",
            "赵磊",
            "13800138006",
            0,
        ),
    ];

    let now = chrono::Utc::now().to_rfc3339();
    for (title, location, style, area, duration, price, images, description, testimonial, foreman_name, foreman_phone, featured) in
        &cases
    {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO cases (
                id, title, location, style, area, duration, price, images,
                description, testimonial, foreman_name, foreman_phone, stage,
                featured, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(location)
        .bind(style)
        .bind(area)
        .bind(duration)
        .bind(price)
        .bind(images)
        .bind(description)
        .bind(testimonial)
        .bind(foreman_name)
        .bind(foreman_phone)
        .bind("完工阶段")
        .bind(featured)
        .bind("published")
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} showcase cases", cases.len());
    Ok(())
}
