use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（OTP 登录账号）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::LastSignInAt).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Class::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Class::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Class::ClassName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Nisn).string().null())
                    .col(ColumnDef::new(Students::Nama).string().not_null())
                    .col(ColumnDef::new(Students::Kelas).big_integer().null())
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::AvatarPath).string().null())
                    .col(ColumnDef::new(Students::LastStatus).string().null())
                    .col(ColumnDef::new(Students::LastDate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::Kelas)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teachers::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Nama).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建管理员表
        manager
            .create_table(
                Table::create()
                    .table(Admin::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admin::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Admin::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Admin::Table, Admin::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attendances::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendances::Date).date().not_null())
                    .col(ColumnDef::new(Attendances::Status).string().not_null())
                    .col(ColumnDef::new(Attendances::AttachmentPath).string().null())
                    .col(ColumnDef::new(Attendances::Note).text().null())
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(SubjectsSchedule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectsSchedule::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubjectsSchedule::Day).string().not_null())
                    .col(ColumnDef::new(SubjectsSchedule::Subject).string().not_null())
                    .col(ColumnDef::new(SubjectsSchedule::StartTime).time().not_null())
                    .col(ColumnDef::new(SubjectsSchedule::EndTime).time().not_null())
                    .col(ColumnDef::new(SubjectsSchedule::Teacher).string().null())
                    .to_owned(),
            )
            .await?;

        // 创建值日表
        manager
            .create_table(
                Table::create()
                    .table(DutySchedule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DutySchedule::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DutySchedule::Day).string().not_null())
                    .col(
                        ColumnDef::new(DutySchedule::StudentName)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 同一学生同一天只能有一条考勤记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendances_student_date")
                    .table(Attendances::Table)
                    .col(Attendances::StudentId)
                    .col(Attendances::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendances_date")
                    .table(Attendances::Table)
                    .col(Attendances::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_kelas")
                    .table(Students::Table)
                    .col(Students::Kelas)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_nama")
                    .table(Students::Table)
                    .col(Students::Nama)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subjects_schedule_day")
                    .table(SubjectsSchedule::Table)
                    .col(SubjectsSchedule::Day)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_duty_schedule_day")
                    .table(DutySchedule::Table)
                    .col(DutySchedule::Day)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DutySchedule::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectsSchedule::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admin::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Class::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    LastSignInAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Class {
    #[sea_orm(iden = "class")]
    Table,
    Id,
    ClassName,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Nisn,
    Nama,
    Kelas,
    UserId,
    AvatarPath,
    LastStatus,
    LastDate,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    UserId,
    Nama,
}

#[derive(DeriveIden)]
enum Admin {
    #[sea_orm(iden = "admin")]
    Table,
    Id,
    UserId,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    StudentId,
    Date,
    Status,
    AttachmentPath,
    Note,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SubjectsSchedule {
    #[sea_orm(iden = "subjects_schedule")]
    Table,
    Id,
    Day,
    Subject,
    StartTime,
    EndTime,
    Teacher,
}

#[derive(DeriveIden)]
enum DutySchedule {
    #[sea_orm(iden = "duty_schedule")]
    Table,
    Id,
    Day,
    StudentName,
}
